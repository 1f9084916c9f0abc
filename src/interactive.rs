//! 対話モード
//!
//! 1行の入力を描画イベント・実行要求に変換してセッションへ渡す。

use crate::client::{PredictionClient, PredictionTransport};
use crate::config::Config;
use crate::error::Result;
use crate::runner::run_prediction;
use crate::terminal::{OverlayTarget, TerminalSurface};
use dialoguer::Input;
use fair_predictor_common::{BoundingBox, DrawEvent, PredictionSession};
use std::path::PathBuf;

/// 対話コマンド
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// 矩形を描画
    Draw(BoundingBox),
    /// 矩形を削除
    Clear,
    /// 推論実行
    Run,
    /// 現在の状態を表示
    Status,
    Help,
    Quit,
}

const HELP: &str = "操作: draw W,S,E,N | clear | run | status | help | quit";

pub fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "draw" | "d" => rest
            .parse::<BoundingBox>()
            .map(Command::Draw)
            .map_err(|e| e.to_string()),
        "clear" | "c" => Ok(Command::Clear),
        "run" | "r" => Ok(Command::Run),
        "status" | "s" => Ok(Command::Status),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        "" => Err("コマンドを入力してください".into()),
        other => Err(format!("不明なコマンド: {}", other)),
    }
}

pub async fn run_interactive<T: PredictionTransport>(
    client: &PredictionClient<T>,
    config: &Config,
    output_dir: PathBuf,
) -> Result<()> {
    let resolved = config.resolve()?;
    let surface = TerminalSurface::new(OverlayTarget::Directory(output_dir));
    let mut session = PredictionSession::new(config.area_policy()?, surface);

    println!("🗺  fair-predictor - 対話モード");
    println!("  サーバー: {}", resolved.endpoint);
    println!("  モデル: {}", config.prediction.model);
    println!("  面積上限: {} km²", session.policy().max_area_sq_km);
    println!("{}\n", HELP);

    loop {
        let prompt = format!(
            "[{}{}]",
            session.state().as_str(),
            if session.is_run_enabled() { " | run可" } else { "" }
        );
        let line: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("✖ {}", message);
                continue;
            }
        };

        match command {
            Command::Draw(bounds) => session.handle(DrawEvent::AreaDrawn(bounds)),
            Command::Clear => session.handle(DrawEvent::AreaCleared),
            Command::Run => {
                run_prediction(&mut session, client, &resolved).await;
            }
            Command::Status => {
                println!("  状態: {}", session.state().as_str());
                match session.selection() {
                    Some(selection) => println!(
                        "  選択範囲: {} ({:.3} km²)",
                        selection.bounds, selection.area_sq_km
                    ),
                    None => println!("  選択範囲: なし"),
                }
                if let Some(overlay) = session.surface().overlay() {
                    println!("  表示中の建物: {}件", overlay.len());
                }
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_draw() {
        let command = parse_command("draw 2.0,48.0,2.01,48.01").unwrap();
        assert_eq!(
            command,
            Command::Draw(BoundingBox::new(2.0, 48.0, 2.01, 48.01).unwrap())
        );
        // 空白入りの座標も受け付ける
        assert!(matches!(
            parse_command("  d -0.13, 51.5, -0.12, 51.51 "),
            Ok(Command::Draw(_))
        ));
    }

    #[test]
    fn test_parse_short_commands() {
        assert_eq!(parse_command("c"), Ok(Command::Clear));
        assert_eq!(parse_command("RUN"), Ok(Command::Run));
        assert_eq!(parse_command("q"), Ok(Command::Quit));
        assert_eq!(parse_command("?"), Ok(Command::Help));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("").is_err());
        assert!(parse_command("draw").is_err());
        assert!(parse_command("draw 2.01,48.0,2.0,48.01").is_err());
        assert!(parse_command("zoom 3").unwrap_err().contains("zoom"));
    }
}
