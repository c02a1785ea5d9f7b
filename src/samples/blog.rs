//! Multiple site support: every scenario starts from the same two users and
//! two blogs, declared once as the feature background.

use std::collections::HashMap;

use stepwise::{ConstructionError, Feature, Scenario, ScenarioContext};

#[derive(Debug, Clone, PartialEq, Eq)]
struct User {
    password: &'static str,
    admin: bool,
}

#[derive(Debug, Default)]
pub struct Site {
    users: HashMap<&'static str, User>,
    blogs: HashMap<&'static str, &'static str>,
    current_user: Option<&'static str>,
    page: String,
}

impl Site {
    fn add_user(&mut self, name: &'static str, password: &'static str, admin: bool) {
        self.users.insert(name, User { password, admin });
    }

    fn login(&mut self, name: &'static str, password: &str) -> Result<(), String> {
        match self.users.get(name) {
            Some(user) if user.password == password => {
                self.current_user = Some(name);
                Ok(())
            }
            _ => Err(format!("invalid credentials for {name}")),
        }
    }

    fn post(&mut self, blog: &str, body: &str) -> Result<(), String> {
        let owner = *self.blogs.get(blog).ok_or_else(|| format!("no blog named {blog}"))?;
        let user = self.current_user.ok_or("nobody is logged in")?;
        let admin = self.users.get(user).is_some_and(|u| u.admin);
        self.page = if user == owner || admin {
            format!("Your article was published.\n{body}")
        } else {
            "Hey! That's not your blog!".to_owned()
        };
        Ok(())
    }

    fn expect_page(&self, text: &str) -> Result<(), String> {
        if self.page.contains(text) {
            Ok(())
        } else {
            Err(format!("page shows {:?}, expected {text:?}", self.page))
        }
    }
}

fn background(ctx: &mut ScenarioContext<Site>) -> Result<(), ConstructionError> {
    ctx.given("a global administrator named \"Greg\"", |site: &mut Site| {
        site.add_user("Greg", "apples", true);
    })?;
    ctx.and("a user named \"Dr. Bill\"", |site: &mut Site| {
        site.add_user("Dr. Bill", "oranges", false);
    })?;
    ctx.and(
        "a blog named \"Greg's anti-tax rants\" owned by \"Greg\"",
        |site: &mut Site| {
            site.blogs.insert("Greg's anti-tax rants", "Greg");
        },
    )?;
    ctx.and(
        "a blog named \"Expensive Therapy\" owned by \"Dr. Bill\"",
        |site: &mut Site| {
            site.blogs.insert("Expensive Therapy", "Dr. Bill");
        },
    )?;
    Ok(())
}

fn posting(
    user: &'static str,
    password: &'static str,
    blog: &'static str,
    expected: &'static str,
) -> impl Fn(&mut ScenarioContext<Site>) -> Result<(), ConstructionError> + Send + Sync + 'static {
    move |ctx: &mut ScenarioContext<Site>| {
        ctx.given(&format!("I am logged in as {user}"), move |site: &mut Site| {
            site.login(user, password)
        })?;
        ctx.when(&format!("I try to post to \"{blog}\""), move |site: &mut Site| {
            site.post(blog, "This is a great blog!")
        })?;
        ctx.then(&format!("I should see \"{expected}\""), move |site: &mut Site| {
            site.expect_page(expected)
        })?;
        Ok(())
    }
}

pub fn feature() -> Feature<Site> {
    Feature::new("Multiple site support")
        .background(background)
        .scenario(Scenario::new(
            "Dr. Bill posts to his own blog",
            posting(
                "Dr. Bill",
                "oranges",
                "Expensive Therapy",
                "Your article was published.",
            ),
        ))
        .scenario(Scenario::new(
            "Dr. Bill tries to post to somebody else's blog, and fails",
            posting(
                "Dr. Bill",
                "oranges",
                "Greg's anti-tax rants",
                "Hey! That's not your blog!",
            ),
        ))
        .scenario(Scenario::new(
            "Greg posts to a client's blog",
            posting(
                "Greg",
                "apples",
                "Expensive Therapy",
                "Your article was published.",
            ),
        ))
}
