pub mod ping_service;
pub mod stock_service;
