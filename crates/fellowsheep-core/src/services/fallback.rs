//! Static data served when the backends cannot be reached.

use crate::models::{Leaderboard, LiveStream, Player, PlayerStats, StreamPlatform};
use rand::Rng;

const GAME_NAME: &str = "Age of Empires II: Definitive Edition";

/// Ladders shown in the ranking selector.
pub fn leaderboards() -> Vec<Leaderboard> {
    vec![
        Leaderboard::new(3, "1v1 Random Map"),
        Leaderboard::new(4, "1v1 Empire Wars"),
        Leaderboard::new(13, "Team Random Map"),
        Leaderboard::new(14, "Team Empire Wars"),
    ]
}

/// Clan members and a handful of well-known pros: (id, name, rating, games, wins).
const ROSTER: [(i64, &str, i64, i64, i64); 25] = [
    (1, "Fs.Kawan", 1850, 245, 198),
    (2, "Fs.SheepKing", 1820, 189, 156),
    (3, "Fs.WoolWarrior", 1780, 167, 134),
    (4, "Fs.FlockCommander", 1750, 145, 112),
    (5, "Fs.RamMaster", 1720, 134, 98),
    (6, "Fs.CastleBuilder", 1680, 156, 108),
    (7, "Fs.SiegeExpert", 1650, 123, 89),
    (8, "Fs.ArcherQueen", 1620, 145, 98),
    (9, "Fs.KnightRider", 1590, 134, 87),
    (10, "Fs.VillagerPro", 1560, 112, 76),
    (11, "TheViper", 1900, 300, 245),
    (12, "DauT", 1880, 289, 234),
    (13, "TaToH", 1860, 267, 212),
    (14, "Liereyy", 1840, 245, 198),
    (15, "Hera", 1820, 223, 187),
    (16, "Yo", 1800, 201, 165),
    (17, "MbL", 1780, 189, 154),
    (18, "Villese", 1760, 178, 143),
    (19, "ACCM", 1740, 167, 132),
    (20, "Nicov", 1720, 156, 121),
    (21, "Fs.TowerRush", 1530, 98, 65),
    (22, "Fs.ScoutRush", 1500, 87, 54),
    (23, "Fs.MonkRush", 1470, 76, 43),
    (24, "Fs.PaladinRush", 1440, 65, 32),
    (25, "Fs.CamelRush", 1410, 54, 21),
];

pub fn players() -> Vec<Player> {
    ROSTER
        .iter()
        .map(|&(id, name, rating, games, wins)| Player::roster(id, name, rating, games, wins))
        .collect()
}

/// Rating spread applied to the roster so each ladder looks different.
fn rating_spread(leaderboard_id: i64) -> Option<i64> {
    match leaderboard_id {
        4 => Some(50),
        13 => Some(25),
        _ => None,
    }
}

/// A leaderboard page built from the roster.
///
/// Ratings are jittered for the Empire Wars and team ladders, then the page is
/// sorted by rating (highest first) and sliced to `[start, start + count)`.
pub fn leaderboard_page(leaderboard_id: i64, start: usize, count: usize) -> Vec<Player> {
    let mut roster = players();

    if let Some(spread) = rating_spread(leaderboard_id) {
        let mut rng = rand::rng();
        for player in &mut roster {
            let offset = rng.random_range(-spread..spread);
            player.rating = player.rating.map(|r| r + offset);
        }
    }

    roster.sort_by(|a, b| b.current_rating().cmp(&a.current_rating()));
    roster.into_iter().skip(start).take(count).collect()
}

/// Stats for the requested ids; ids outside the roster are dropped.
pub fn personal_stats(profile_ids: &[i64]) -> Vec<PlayerStats> {
    let roster = players();
    profile_ids
        .iter()
        .filter_map(|id| roster.iter().find(|p| p.profile_id == Some(*id)))
        .filter_map(PlayerStats::from_player)
        .collect()
}

/// Placeholder thumbnail: a solid card with a caption, as an inline SVG data URI.
fn thumbnail(caption: &str, fill: &str) -> String {
    let svg = format!(
        r#"<svg width="320" height="180" xmlns="http://www.w3.org/2000/svg"><rect width="320" height="180" fill="{fill}"/><text x="160" y="90" font-family="Arial, sans-serif" font-size="18" fill="white" text-anchor="middle">{caption}</text></svg>"#
    );
    format!("data:image/svg+xml;utf8,{}", urlencoding::encode(&svg))
}

pub fn twitch_streams() -> Vec<LiveStream> {
    vec![
        LiveStream {
            id: 1,
            username: "fs_kawan".into(),
            title: "Age of Empires 2 DE - Ranked Games".into(),
            game: GAME_NAME.into(),
            viewer_count: 245,
            thumbnail: thumbnail("Fs.Kawan Live", "#6441a5"),
            url: "https://twitch.tv/fs_kawan".into(),
            platform: StreamPlatform::Twitch,
        },
        LiveStream {
            id: 2,
            username: "sheepking_aoe".into(),
            title: "Empire Wars Tournament Practice".into(),
            game: GAME_NAME.into(),
            viewer_count: 189,
            thumbnail: thumbnail("SheepKing Live", "#6441a5"),
            url: "https://twitch.tv/sheepking_aoe".into(),
            platform: StreamPlatform::Twitch,
        },
    ]
}

pub fn youtube_streams() -> Vec<LiveStream> {
    vec![LiveStream {
        id: 1,
        username: "FellowSheep Gaming".into(),
        title: "Team Games Night - Age of Empires 2 DE".into(),
        game: GAME_NAME.into(),
        viewer_count: 156,
        thumbnail: thumbnail("FellowSheep Live", "#ff0000"),
        url: "https://youtube.com/watch?v=live_stream".into(),
        platform: StreamPlatform::Youtube,
    }]
}
