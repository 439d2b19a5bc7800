//! Project token parsing.
//!
//! A project token is a single opaque string handed out by the web app.
//! It packs three values by fixed-length slicing: a 40-character API
//! token, a 16-character team id, and a trailing decimal project index.

/// Length of the API-token segment.
pub const API_TOKEN_LENGTH: usize = 40;

/// Length of the team-id segment.
pub const TEAM_ID_LENGTH: usize = 16;

/// Error returned when a project token cannot be sliced into its parts.
#[derive(Debug, thiserror::Error)]
#[error("malformed project token")]
pub struct MalformedToken;

/// The three components packed into a project token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenParts {
    pub api_token: String,
    pub team_id: String,
    pub project_index: u32,
}

/// Splits a project token into `{api_token, team_id, project_index}`.
///
/// The project index is everything after the two fixed-length segments
/// and must be a decimal integer >= 1.
pub fn token_parts(token: &str) -> Result<TokenParts, MalformedToken> {
    if !token.is_ascii() || token.len() <= API_TOKEN_LENGTH + TEAM_ID_LENGTH {
        return Err(MalformedToken);
    }

    let (api_token, rest) = token.split_at(API_TOKEN_LENGTH);
    let (team_id, index) = rest.split_at(TEAM_ID_LENGTH);

    let project_index: u32 = index.parse().map_err(|_| MalformedToken)?;
    if project_index < 1 {
        return Err(MalformedToken);
    }

    Ok(TokenParts {
        api_token: api_token.to_string(),
        team_id: team_id.to_string(),
        project_index,
    })
}
