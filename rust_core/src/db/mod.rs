pub mod gold_price;
pub mod pool;
pub mod user;

pub use gold_price::{insert_fetch_result, insert_gold_price, latest_gold_price};
pub use pool::{create_default_pool, create_pool, database_url_from_env, DbPoolConfig};
pub use user::{get_user_by_telegram_id, upsert_user};
