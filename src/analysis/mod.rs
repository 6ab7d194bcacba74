pub mod coincidence;
pub mod seeder;

pub use self::coincidence::{estimate_periods, PeriodScore};
pub use self::seeder::seed_key;
