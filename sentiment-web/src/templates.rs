use {
    minijinja::{context, Environment},
    serde::Serialize,
};

const BASE_TEMPLATE: &str = include_str!("../templates/base.html");
const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
const NOT_FOUND_TEMPLATE: &str = include_str!("../templates/404.html");
const ERROR_TEMPLATE: &str = include_str!("../templates/error.html");

/// Page templates, compiled once at startup.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("base.html", BASE_TEMPLATE)?;
        env.add_template("index.html", INDEX_TEMPLATE)?;
        env.add_template("404.html", NOT_FOUND_TEMPLATE)?;
        env.add_template("error.html", ERROR_TEMPLATE)?;

        Ok(Self {
            env,
        })
    }

    pub fn index<T: Serialize>(&self, result: Option<&T>, msg: Option<&str>) -> Result<String, minijinja::Error> {
        self.env.get_template("index.html")?.render(context! {
            result => result,
            msg => msg,
        })
    }

    pub fn not_found(&self) -> Result<String, minijinja::Error> {
        self.env.get_template("404.html")?.render(context! {})
    }

    pub fn error(&self, detail: &str) -> Result<String, minijinja::Error> {
        self.env.get_template("error.html")?.render(context! {
            detail => detail,
        })
    }
}
