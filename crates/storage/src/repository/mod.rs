//! One repository per aggregate. Methods take any [`sqlx::SqliteExecutor`]
//! so they work against the pool for one-shot reads and against an open
//! transaction when a service composes several of them atomically.

pub mod bots;
pub mod maps;
pub mod matches;
pub mod results;
pub mod rounds;
pub mod seasons;
pub mod settings;
pub mod stats;

pub use bots::BotRepository;
pub use maps::MapRepository;
pub use matches::MatchRepository;
pub use results::ResultRepository;
pub use rounds::RoundRepository;
pub use seasons::SeasonRepository;
pub use settings::SettingsRepository;
pub use stats::StatsRepository;
