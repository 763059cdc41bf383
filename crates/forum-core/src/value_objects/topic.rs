//! Topic naming for the real-time layer.
//!
//! A topic is a logical channel derived from an entity kind and id. It is
//! never persisted; it only exists in the broker's runtime state.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value_objects::Snowflake;

/// Topic prefix for an actor's personal channel
pub const USER_TOPIC_PREFIX: &str = "user:";
/// Topic prefix for a post's channel (score and thread updates)
pub const POST_TOPIC_PREFIX: &str = "post:";
/// Topic prefix for a team's channel (membership updates)
pub const TEAM_TOPIC_PREFIX: &str = "team:";

/// A real-time channel identifying a set of interested connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Events addressed to one actor (all of their connections)
    User(Snowflake),
    /// Events about one post and its thread
    Post(Snowflake),
    /// Events about one team's membership
    Team(Snowflake),
}

impl Topic {
    /// Create a user topic
    #[must_use]
    pub fn user(user_id: Snowflake) -> Self {
        Self::User(user_id)
    }

    /// Create a post topic
    #[must_use]
    pub fn post(post_id: Snowflake) -> Self {
        Self::Post(post_id)
    }

    /// Create a team topic
    #[must_use]
    pub fn team(team_id: Snowflake) -> Self {
        Self::Team(team_id)
    }

    /// Get the wire name of this topic
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::User(id) => format!("{USER_TOPIC_PREFIX}{id}"),
            Self::Post(id) => format!("{POST_TOPIC_PREFIX}{id}"),
            Self::Team(id) => format!("{TEAM_TOPIC_PREFIX}{id}"),
        }
    }

    /// Parse a wire name back to a `Topic`.
    ///
    /// Returns `None` for anything that is not exactly one of the three
    /// known forms; subscribe requests naming unknown topics are rejected.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        if let Some(id) = name.strip_prefix(USER_TOPIC_PREFIX) {
            return id.parse::<i64>().ok().map(|id| Self::User(Snowflake::from(id)));
        }
        if let Some(id) = name.strip_prefix(POST_TOPIC_PREFIX) {
            return id.parse::<i64>().ok().map(|id| Self::Post(Snowflake::from(id)));
        }
        if let Some(id) = name.strip_prefix(TEAM_TOPIC_PREFIX) {
            return id.parse::<i64>().ok().map(|id| Self::Team(Snowflake::from(id)));
        }
        None
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for Topic {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for Topic {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Topic::parse(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown topic '{name}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_names() {
        assert_eq!(Topic::user(Snowflake::new(11)).name(), "user:11");
        assert_eq!(Topic::post(Snowflake::new(22)).name(), "post:22");
        assert_eq!(Topic::team(Snowflake::new(33)).name(), "team:33");
    }

    #[test]
    fn test_topic_parse_roundtrip() {
        for raw in ["user:11", "post:22", "team:33"] {
            let topic = Topic::parse(raw).unwrap();
            assert_eq!(topic.name(), raw);
        }
    }

    #[test]
    fn test_topic_parse_rejects_unknown() {
        assert!(Topic::parse("forum:1").is_none());
        assert!(Topic::parse("post:abc").is_none());
        assert!(Topic::parse("post").is_none());
        assert!(Topic::parse("").is_none());
    }

    #[test]
    fn test_topic_serde_as_string() {
        let topic = Topic::post(Snowflake::new(5));
        let json = serde_json::to_string(&topic).unwrap();
        assert_eq!(json, "\"post:5\"");

        let back: Topic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, topic);

        let bad: Result<Topic, _> = serde_json::from_str("\"room:5\"");
        assert!(bad.is_err());
    }
}
