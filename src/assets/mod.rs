/// Binary-to-data-URI encoding.
pub mod encode;
/// Remote asset fetching.
pub mod fetch;
/// Font table loading.
pub mod font;
