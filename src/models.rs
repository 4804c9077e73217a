//! Upstream payload shapes and the dashboard JSON they are reshaped into.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

const TEAM_CREST: &str = "/placeholder.svg?height=32&width=32";
const SMALL_CREST: &str = "/placeholder.svg?height=24&width=24";

// football-data.org team reference
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiTeam {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub crest: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct ApiScoreLine {
    pub home: Option<i64>,
    pub away: Option<i64>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiScore {
    pub full_time: ApiScoreLine,
    pub half_time: ApiScoreLine,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct ApiCompetition {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub emblem: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ApiMatch {
    pub id: i64,
    pub home_team: ApiTeam,
    pub away_team: ApiTeam,
    #[serde(default)]
    pub score: ApiScore,
    #[serde(default, deserialize_with = "present")]
    pub status: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub minute: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub utc_date: Option<Value>,
    #[serde(default)]
    pub competition: ApiCompetition,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub matchday: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub stage: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub last_updated: Option<Value>,
}

// Some(Null) for an explicit null, None only when the field is missing
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

// Empty strings count as missing, like absent fields
fn filled(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|s| !s.is_empty()).map(str::to_string)
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ApiTableRow {
    pub position: i64,
    pub team: ApiTeam,
    #[serde(default)]
    pub played_games: i64,
    #[serde(default)]
    pub won: i64,
    #[serde(default)]
    pub draw: i64,
    #[serde(default)]
    pub lost: i64,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub goals_for: i64,
    #[serde(default)]
    pub goals_against: i64,
    #[serde(default)]
    pub goal_difference: i64,
}

// Dashboard shapes

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamView {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub crest: String,
}

impl TeamView {
    fn from_api(team: &ApiTeam, placeholder: &str) -> Self {
        Self {
            id: team.id,
            name: team.name.clone(),
            short_name: filled(&team.short_name).or_else(|| team.name.clone()),
            crest: filled(&team.crest).unwrap_or_else(|| placeholder.to_string()),
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ScoreLineView {
    pub home: Option<i64>,
    pub away: Option<i64>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreView {
    pub full_time: ScoreLineView,
    pub half_time: ScoreLineView,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CompetitionView {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub emblem: String,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub id: i64,
    pub home_team: TeamView,
    pub away_team: TeamView,
    pub score: ScoreView,
    // upstream passthrough: null stays null, a missing field stays missing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minute: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_date: Option<Value>,
    pub competition: CompetitionView,
    pub venue: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matchday: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<Value>,
}

impl From<ApiMatch> for MatchView {
    fn from(m: ApiMatch) -> Self {
        Self {
            id: m.id,
            home_team: TeamView::from_api(&m.home_team, TEAM_CREST),
            away_team: TeamView::from_api(&m.away_team, TEAM_CREST),
            score: ScoreView {
                full_time: ScoreLineView {
                    home: m.score.full_time.home,
                    away: m.score.full_time.away,
                },
                half_time: ScoreLineView {
                    home: m.score.half_time.home,
                    away: m.score.half_time.away,
                },
            },
            status: m.status,
            minute: m.minute,
            utc_date: m.utc_date,
            competition: CompetitionView {
                id: m.competition.id,
                name: m.competition.name,
                emblem: filled(&m.competition.emblem).unwrap_or_else(|| SMALL_CREST.to_string()),
            },
            venue: filled(&m.venue).unwrap_or_else(|| "TBD".to_string()),
            matchday: m.matchday,
            stage: m.stage,
            last_updated: m.last_updated,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TableRowView {
    pub position: i64,
    pub team: TeamView,
    pub played_games: i64,
    pub won: i64,
    pub draw: i64,
    pub lost: i64,
    pub points: i64,
    pub goals_for: i64,
    pub goals_against: i64,
    pub goal_difference: i64,
}

impl From<ApiTableRow> for TableRowView {
    fn from(row: ApiTableRow) -> Self {
        Self {
            position: row.position,
            team: TeamView::from_api(&row.team, SMALL_CREST),
            played_games: row.played_games,
            won: row.won,
            draw: row.draw,
            lost: row.lost,
            points: row.points,
            goals_for: row.goals_for,
            goals_against: row.goals_against,
            goal_difference: row.goal_difference,
        }
    }
}

/// Reshape `data.matches`; a missing list yields an empty one.
pub fn transform_matches(data: &Value) -> Result<Vec<MatchView>, serde_json::Error> {
    match data.get("matches") {
        Some(list) if list.is_array() => {
            let matches: Vec<ApiMatch> = serde_json::from_value(list.clone())?;
            Ok(matches.into_iter().map(MatchView::from).collect())
        }
        _ => Ok(Vec::new()),
    }
}

/// Reshape the first table of `data.standings`.
pub fn transform_table(data: &Value) -> Result<Vec<TableRowView>, serde_json::Error> {
    match first_table(data) {
        Some(table) => {
            let rows: Vec<ApiTableRow> = serde_json::from_value(table.clone())?;
            Ok(rows.into_iter().map(TableRowView::from).collect())
        }
        None => Ok(Vec::new()),
    }
}

// standings[0].table, untouched
pub fn first_table(data: &Value) -> Option<&Value> {
    data.get("standings")?
        .get(0)?
        .get("table")
        .filter(|table| table.is_array())
}
