//! fair-predictor
//!
//! 矩形範囲を選択し、建物検出推論サーバーへ送信して結果のポリゴンを受け取るCLI。

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod interactive;
pub mod logging;
pub mod runner;
pub mod terminal;
