#[cfg(test)]
use crate::core::app::App;
#[cfg(test)]
use crate::core::config::Config;
#[cfg(test)]
use crate::core::session::SessionManager;
#[cfg(test)]
use crate::utils::logging::LoggingState;

#[cfg(test)]
pub fn create_test_app() -> App {
    let config = Config {
        name: "Scribe".to_string(),
        persona: "Speak plainly.".to_string(),
        api_key: None,
        base_url: "https://api.test.com/v1".to_string(),
        model: "test-model".to_string(),
    };
    let session = SessionManager::new(
        config.base_url.clone(),
        config.model.clone(),
        config.persona.clone(),
    );
    let mut app = App::new(config, session, LoggingState::new(None).unwrap());
    app.set_config_path_for_test(
        std::env::temp_dir()
            .join("scrive-tests")
            .join("config.toml"),
    );
    app
}

#[cfg(test)]
pub fn create_connected_test_app() -> App {
    let mut app = create_test_app();
    app.session.authenticate_offline("sk-test");
    app
}
