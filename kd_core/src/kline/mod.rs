pub mod daily_price;
