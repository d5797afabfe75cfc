use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum EventError {
    Observer {
        message: String,
    },
}

impl EventError {
    pub fn observer(message: &str) -> Self {
        Self::Observer {
            message: message.to_string(),
        }
    }
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::Observer { message } => write!(f, "Observer error: {}", message),
        }
    }
}

impl std::error::Error for EventError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_error_observer() {
        let error = EventError::observer("Observer failed to execute");

        match &error {
            EventError::Observer { message } => {
                assert_eq!(message, "Observer failed to execute");
            }
        }
        assert_eq!(format!("{}", error), "Observer error: Observer failed to execute");
    }
}
