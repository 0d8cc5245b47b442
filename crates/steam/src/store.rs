//! Store-agnostic handler seam.

use std::future::Future;
use std::pin::Pin;

use crate::error::GameFinderError;
use crate::types::SteamGame;

/// A game store whose installed titles can be enumerated.
pub trait StoreHandler: Send + Sync {
    /// Short identifier, e.g. `"steam"`.
    fn store_id(&self) -> &'static str;

    /// Human-readable store name.
    fn store_name(&self) -> &'static str;

    fn find_all_games(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<SteamGame>, GameFinderError>> + Send + '_>>;

    fn is_available(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
}
