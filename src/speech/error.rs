//! Recognition error classification
//!
//! Every error the engine reports is mapped onto one of these kinds at
//! the controller boundary, logged, and swallowed. None of them reach
//! the user as a dialog or an exception.

use std::fmt;

/// Classified recognition failure, mirroring the platform recognizer's
/// numeric error code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    /// Audio recording failed
    Audio,
    /// Client-side error (bad request, engine misuse)
    Client,
    /// Missing record-audio permission at the engine level
    InsufficientPermissions,
    /// Network failure while reaching the recognition service
    Network,
    /// Network operation timed out
    NetworkTimeout,
    /// Audio was captured but nothing matched
    NoMatch,
    /// The engine is already servicing another client
    RecognizerBusy,
    /// Recognition service reported a server-side failure
    Server,
    /// No speech heard before the engine gave up
    SpeechTimeout,
    /// Anything outside the known code range
    Unknown,
}

impl RecognitionErrorKind {
    /// Classify a raw engine error code.
    pub fn classify(code: i32) -> Self {
        match code {
            1 => RecognitionErrorKind::NetworkTimeout,
            2 => RecognitionErrorKind::Network,
            3 => RecognitionErrorKind::Audio,
            4 => RecognitionErrorKind::Server,
            5 => RecognitionErrorKind::Client,
            6 => RecognitionErrorKind::SpeechTimeout,
            7 => RecognitionErrorKind::NoMatch,
            8 => RecognitionErrorKind::RecognizerBusy,
            9 => RecognitionErrorKind::InsufficientPermissions,
            _ => RecognitionErrorKind::Unknown,
        }
    }
}

impl fmt::Display for RecognitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecognitionErrorKind::Audio => "AudioError",
            RecognitionErrorKind::Client => "ClientError",
            RecognitionErrorKind::InsufficientPermissions => "InsufficientPermissionsError",
            RecognitionErrorKind::Network => "NetworkError",
            RecognitionErrorKind::NetworkTimeout => "NetworkTimeoutError",
            RecognitionErrorKind::NoMatch => "NoMatchError",
            RecognitionErrorKind::RecognizerBusy => "RecognizerBusyError",
            RecognitionErrorKind::Server => "ServerError",
            RecognitionErrorKind::SpeechTimeout => "SpeechTimeoutError",
            RecognitionErrorKind::Unknown => "UnknownError",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_classify() {
        assert_eq!(
            RecognitionErrorKind::classify(2),
            RecognitionErrorKind::Network
        );
        assert_eq!(
            RecognitionErrorKind::classify(7),
            RecognitionErrorKind::NoMatch
        );
        assert_eq!(
            RecognitionErrorKind::classify(9),
            RecognitionErrorKind::InsufficientPermissions
        );
    }

    #[test]
    fn test_out_of_range_codes_are_unknown() {
        assert_eq!(
            RecognitionErrorKind::classify(0),
            RecognitionErrorKind::Unknown
        );
        assert_eq!(
            RecognitionErrorKind::classify(10),
            RecognitionErrorKind::Unknown
        );
        assert_eq!(
            RecognitionErrorKind::classify(-1),
            RecognitionErrorKind::Unknown
        );
    }

    #[test]
    fn test_display_names() {
        assert_eq!(RecognitionErrorKind::Network.to_string(), "NetworkError");
        assert_eq!(
            RecognitionErrorKind::SpeechTimeout.to_string(),
            "SpeechTimeoutError"
        );
    }
}
