use serde::Serialize;

/// Body of a `PUT mocks` call. Exactly one of the optional fields is set by
/// the constructors below.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MockUpdate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echo: Option<bool>,
}

impl MockUpdate {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            scenario: None,
            delay: None,
            echo: None,
        }
    }

    pub fn scenario(name: &str, scenario: &str) -> Self {
        Self {
            scenario: Some(scenario.to_string()),
            ..Self::named(name)
        }
    }

    pub fn delay(name: &str, delay: u64) -> Self {
        Self {
            delay: Some(delay),
            ..Self::named(name)
        }
    }

    pub fn echo(name: &str, echo: bool) -> Self {
        Self {
            echo: Some(echo),
            ..Self::named(name)
        }
    }
}

/// Global actions accepted by `PUT actions`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Action {
    /// Reset every mock to its default scenario.
    Defaults,
    /// Forward every mock to the real upstream.
    PassThroughs,
    Record { record: bool },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PresetSelection {
    pub name: String,
}

impl PresetSelection {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

pub type Variables = serde_json::Map<String, serde_json::Value>;
