pub mod bot;
pub mod map;
pub mod matches;
pub mod participation;
pub mod result;
pub mod round;
pub mod season;
pub mod settings;
pub mod stats;

pub use bot::Bot;
pub use map::Map;
pub use matches::Match;
pub use participation::{MatchParticipation, OutcomeCause, RelativeOutcome};
pub use result::{MatchResult, OutcomeType};
pub use round::Round;
pub use season::Season;
pub use settings::LadderConfig;
pub use stats::{BotMapStats, BotMatchupStats, BotStats};
