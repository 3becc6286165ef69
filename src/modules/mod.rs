pub mod bot;
pub mod conversion;
