pub mod market_store;
