//! Leaderboard entities.
//!
//! The provider and the site backends disagree on field names (`name` vs
//! `profileName` vs `nickname`, `rating` vs `elo`), so the optional variants
//! are all kept and accessors pick whichever is present. Fields this crate
//! does not know about are preserved in `extra` and serialized back verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Member fields copied onto provider stat rows that lack them.
const MEMBER_FIELDS: [&str; 3] = ["alias", "profile_id", "country"];

/// A ranked player as returned by the leaderboard endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(default, alias = "profile_id", skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elo: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub games: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_games: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wins: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub losses: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Player {
    /// Build a roster entry with both `name` and `profileName` set.
    pub fn roster(profile_id: i64, name: &str, rating: i64, games: i64, wins: i64) -> Self {
        Self {
            profile_id: Some(profile_id),
            name: Some(name.to_string()),
            profile_name: Some(name.to_string()),
            rating: Some(rating),
            games: Some(games),
            wins: Some(wins),
            ..Self::default()
        }
    }

    fn names(&self) -> [&Option<String>; 4] {
        [&self.name, &self.profile_name, &self.nickname, &self.alias]
    }

    /// The first non-empty of `name`, `profileName`, `nickname`, `alias`.
    pub fn display_name(&self) -> &str {
        self.names()
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|n| !n.is_empty())
            .unwrap_or("")
    }

    pub fn current_rating(&self) -> Option<i64> {
        self.rating.or(self.elo)
    }

    pub fn game_count(&self) -> Option<i64> {
        self.games.or(self.total_games)
    }

    /// Reported losses, or games minus wins when the source omits them.
    pub fn loss_count(&self) -> Option<i64> {
        self.losses.or_else(|| {
            self.game_count()
                .zip(self.wins)
                .map(|(games, wins)| (games - wins).max(0))
        })
    }

    /// Case-insensitive substring match on any of the name fields.
    pub fn name_contains(&self, needle_lower: &str) -> bool {
        self.names()
            .into_iter()
            .flatten()
            .any(|n| n.to_lowercase().contains(needle_lower))
    }
}

/// Condensed per-player statistics used by the personal stats view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub profile_id: i64,
    pub name: String,
    pub rating: i64,
    pub games: i64,
    pub wins: i64,
    pub losses: i64,
    /// Win percentage with one decimal, e.g. `"80.8"`.
    pub win_rate: String,
}

impl PlayerStats {
    pub fn from_player(player: &Player) -> Option<Self> {
        let games = player.game_count().unwrap_or(0);
        let wins = player.wins.unwrap_or(0);
        let win_rate = if games > 0 {
            format!("{:.1}", wins as f64 / games as f64 * 100.0)
        } else {
            "0.0".to_string()
        };

        Some(Self {
            profile_id: player.profile_id?,
            name: player.display_name().to_string(),
            rating: player.current_rating().unwrap_or(0),
            games,
            wins,
            losses: player.loss_count().unwrap_or(0),
            win_rate,
        })
    }
}

/// A ranked ladder offered by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Leaderboard {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            extra: Map::new(),
        }
    }
}

/// Accepts either a bare list or the provider's `{"leaderboards": [...]}` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum LeaderboardsPayload {
    List(Vec<Leaderboard>),
    Wrapped { leaderboards: Vec<Leaderboard> },
}

impl LeaderboardsPayload {
    pub(crate) fn into_vec(self) -> Vec<Leaderboard> {
        match self {
            LeaderboardsPayload::List(list) => list,
            LeaderboardsPayload::Wrapped { leaderboards } => leaderboards,
        }
    }
}

/// Player rows of a ranking response.
///
/// Accepts a bare list, or a page object carrying `leaderboardStats` (or
/// `players`). Provider stat rows only reference their stat group, so each
/// row is given the `alias`, `profile_id` and `country` of the group's first
/// member from `statGroups`. Any other shape yields `None`.
pub fn ranking_rows(ranking: Value) -> Option<Vec<Value>> {
    let mut page = match ranking {
        Value::Array(rows) => return Some(rows),
        Value::Object(page) => page,
        _ => return None,
    };

    let mut rows = match page.remove("leaderboardStats").or_else(|| page.remove("players")) {
        Some(Value::Array(rows)) => rows,
        _ => return None,
    };

    let members: HashMap<i64, Map<String, Value>> = match page.remove("statGroups") {
        Some(Value::Array(groups)) => groups.into_iter().filter_map(first_member).collect(),
        _ => HashMap::new(),
    };

    for row in &mut rows {
        let Value::Object(row) = row else {
            continue;
        };
        let Some(member) = row
            .get("statgroup_id")
            .and_then(Value::as_i64)
            .and_then(|id| members.get(&id))
        else {
            continue;
        };
        for key in MEMBER_FIELDS {
            if let Some(value) = member.get(key) {
                row.entry(key).or_insert_with(|| value.clone());
            }
        }
    }
    Some(rows)
}

fn first_member(group: Value) -> Option<(i64, Map<String, Value>)> {
    let Value::Object(mut group) = group else {
        return None;
    };
    let id = group.get("id").and_then(Value::as_i64)?;
    let Some(Value::Array(members)) = group.remove("members") else {
        return None;
    };
    match members.into_iter().next()? {
        Value::Object(member) => Some((id, member)),
        _ => None,
    }
}

/// A leaderboard page split into everyone and clan members.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanRanking {
    pub all_players: Vec<Player>,
    pub clan_players: Vec<Player>,
    pub total_clan_players: usize,
    pub total_players: usize,
}
