pub mod drop_queries;
pub mod product_queries;
pub mod stock_queries;
