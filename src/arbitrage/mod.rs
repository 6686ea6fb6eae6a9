pub mod evaluator;
pub mod rates;
pub mod types;

pub use evaluator::{best_opportunity, evaluate, evaluate_with_report};
pub use rates::{discounted_spot, implied_rate, implied_spot};
pub use types::{DroppedContract, Evaluation, FrictionConfig, OpportunityResult, Strategy};
