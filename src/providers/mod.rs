pub mod apps_script;

pub use apps_script::AppsScriptProvider;
