//! Live games and streams shown on the home page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A clan game currently being played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveGame {
    pub id: i64,
    pub player1: String,
    pub player2: String,
    pub map: String,
    pub game_type: String,
    pub start_time: DateTime<Utc>,
    pub status: String,
    pub score: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamPlatform {
    Twitch,
    Youtube,
}

/// A live broadcast by a clan member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStream {
    pub id: i64,
    pub username: String,
    pub title: String,
    pub game: String,
    pub viewer_count: u32,
    pub thumbnail: String,
    pub url: String,
    pub platform: StreamPlatform,
}

// Backend payloads

/// A match from `/api/liveFsMatches`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LiveMatch {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub mapname: Option<String>,
    #[serde(default, rename = "gameType")]
    pub game_type: Option<String>,
    #[serde(default)]
    pub startgametime: Option<i64>,
    #[serde(default)]
    pub teams: Option<MatchTeams>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct MatchTeams {
    #[serde(default)]
    pub team0: Vec<TeamMember>,
    #[serde(default)]
    pub team1: Vec<TeamMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TeamMember {
    #[serde(default)]
    pub name: String,
}

/// A clan member from `/api/liveFs1v1`, used when no team matches are listed.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LadderPresence {
    #[serde(default)]
    pub profile_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub last_match_time: Option<i64>,
}

/// Convert Unix seconds to a UTC timestamp; missing or invalid values map to the epoch.
pub(crate) fn from_unix_seconds(secs: Option<i64>) -> DateTime<Utc> {
    DateTime::from_timestamp(secs.unwrap_or(0), 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_live_game_serializes_camel_case() {
        let game = LiveGame {
            id: 1,
            player1: "Fs.Kawan".into(),
            player2: "DauT".into(),
            map: "Arabia".into(),
            game_type: "1v1 Random Map".into(),
            start_time: from_unix_seconds(Some(1_700_000_000)),
            status: "playing".into(),
            score: "0-0".into(),
        };
        let value = serde_json::to_value(&game).unwrap();
        assert_eq!(value["gameType"], json!("1v1 Random Map"));
        assert_eq!(value["startTime"], json!("2023-11-14T22:13:20Z"));
    }

    #[test]
    fn test_match_without_teams() {
        let m: LiveMatch = serde_json::from_value(json!({"id": 9})).unwrap();
        assert!(m.teams.is_none());
        assert!(m.mapname.is_none());
    }

    #[test]
    fn test_partial_records_still_decode() {
        let m: LiveMatch = serde_json::from_value(json!({"mapname": "Arabia"})).unwrap();
        assert_eq!(m.id, 0);

        let p: LadderPresence = serde_json::from_value(json!({"name": "Fs.Kawan"})).unwrap();
        assert_eq!(p.profile_id, 0);
        assert!(p.last_match_time.is_none());
    }

    #[test]
    fn test_missing_timestamp_is_epoch() {
        assert_eq!(from_unix_seconds(None).timestamp(), 0);
    }
}
