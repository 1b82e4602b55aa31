use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Optional plain-text transcript log. Independent of the diagnostic stream:
/// this is the user-facing export of the conversation, enabled with the
/// `--log` flag or the `/log` command.
pub struct LoggingState {
    file_path: Option<String>,
    is_active: bool,
}

impl LoggingState {
    pub fn new(log_file: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let is_active = log_file.is_some();
        Ok(LoggingState {
            file_path: log_file,
            is_active,
        })
    }

    pub fn set_log_file(&mut self, path: String) -> Result<String, Box<dyn std::error::Error>> {
        // Test if we can create/write to the file
        self.test_file_access(&path)?;

        self.file_path = Some(path.clone());
        self.is_active = true;

        Ok(format!("Logging enabled to: {path}"))
    }

    pub fn toggle_logging(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        match &self.file_path {
            Some(path) => {
                self.is_active = !self.is_active;
                if self.is_active {
                    Ok(format!("Logging resumed to: {path}"))
                } else {
                    Ok(format!("Logging paused (file: {path})"))
                }
            }
            None => {
                Err("No log file specified. Use /log <filename> to enable logging first.".into())
            }
        }
    }

    pub fn log_message(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        if !self.is_active || self.file_path.is_none() {
            return Ok(());
        }

        let file_path = self.file_path.as_ref().unwrap();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;

        let mut writer = BufWriter::new(file);

        // Write each line of content, preserving the exact formatting
        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }

        // Empty line after each message for spacing, matching the screen
        writeln!(writer)?;

        writer.flush()?;
        Ok(())
    }

    pub fn get_status_string(&self) -> String {
        match (&self.file_path, self.is_active) {
            (None, _) => "disabled".to_string(),
            (Some(path), true) => format!(
                "active ({})",
                Path::new(path)
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            ),
            (Some(path), false) => format!(
                "paused ({})",
                Path::new(path)
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            ),
        }
    }

    fn test_file_access(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_logging_writes_nothing() {
        let logging = LoggingState::new(None).unwrap();
        assert!(logging.log_message("hello").is_ok());
        assert_eq!(logging.get_status_string(), "disabled");
    }

    #[test]
    fn messages_append_with_spacing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.log");
        let logging =
            LoggingState::new(Some(path.to_string_lossy().into_owned())).unwrap();

        logging.log_message("You: hello").unwrap();
        logging.log_message("Hi there.").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "You: hello\n\nHi there.\n\n");
    }

    #[test]
    fn toggle_without_file_is_an_error() {
        let mut logging = LoggingState::new(None).unwrap();
        assert!(logging.toggle_logging().is_err());
    }

    #[test]
    fn toggle_pauses_and_resumes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.log");
        let mut logging =
            LoggingState::new(Some(path.to_string_lossy().into_owned())).unwrap();

        let paused = logging.toggle_logging().unwrap();
        assert!(paused.contains("paused"));
        assert!(logging.get_status_string().starts_with("paused"));

        let resumed = logging.toggle_logging().unwrap();
        assert!(resumed.contains("resumed"));
        assert!(logging.get_status_string().starts_with("active"));
    }
}
