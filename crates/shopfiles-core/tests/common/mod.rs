pub mod shop_server;
