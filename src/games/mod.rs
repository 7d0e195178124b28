pub mod crypto_poly;
