//! Step definitions for the behavioural suite.

mod declaration_steps;
mod outcome_steps;
