use anyhow::Context;
use clap::Parser;
use fair_predictor::cli::{Cli, Commands};
use fair_predictor::client::PredictionClient;
use fair_predictor::config::Config;
use fair_predictor::error::PredictorError;
use fair_predictor::terminal::OverlayTarget;
use fair_predictor::{interactive, logging, runner};
use fair_predictor_common::{compute_area_sq_km, AreaVerdict};

fn build_client(config: &Config) -> anyhow::Result<PredictionClient> {
    let client = PredictionClient::http().context("HTTPクライアントを作成できません")?;
    Ok(match config.deadline() {
        Some(deadline) => client.with_deadline(deadline),
        None => client,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let mut config = Config::load().context("設定ファイルを読み込めません")?;

    match cli.command {
        Commands::Area { bbox, max_area } => {
            if let Some(max_area) = max_area {
                config.max_area_sq_km = max_area;
            }
            let policy = config.area_policy()?;

            println!("📐 fair-predictor - 面積チェック\n");
            println!("  範囲: {}", bbox);
            match policy.validate(compute_area_sq_km(&bbox)) {
                AreaVerdict::Valid { area_sq_km } => {
                    println!("✔ {:.3} km² (上限 {} km²)", area_sq_km, policy.max_area_sq_km);
                }
                AreaVerdict::Rejected(rejection) => {
                    println!("✖ {}", rejection);
                    anyhow::bail!(PredictorError::AreaRejected(rejection));
                }
            }
        }

        Commands::Predict { bbox, options, output } => {
            options.apply(&mut config);
            let client = build_client(&config)?;
            let target = match output {
                Some(path) => OverlayTarget::File(path),
                None => OverlayTarget::Directory(std::path::PathBuf::from(".")),
            };

            println!("🏠 fair-predictor - 建物検出\n");
            println!("  範囲: {}", bbox);
            println!("  サーバー: {} / モデル: {}", config.prediction.server, config.prediction.model);

            let summary = runner::predict_area(&client, &config, bbox, target).await?;

            println!("\n✅ 完了: {}件の建物 ({:.3} km²)", summary.count, summary.area_sq_km);
            if let Some(path) = summary.output {
                println!("  GeoJSON: {}", path.display());
            }
        }

        Commands::Interactive { options, output_dir } => {
            options.apply(&mut config);
            let client = build_client(&config)?;
            std::fs::create_dir_all(&output_dir)
                .with_context(|| format!("出力先を作成できません: {}", output_dir.display()))?;
            interactive::run_interactive(&client, &config, output_dir).await?;
        }

        Commands::Config { server, model, max_area, show } => {
            let changed = server.is_some() || model.is_some() || max_area.is_some();
            if let Some(server) = server {
                config.prediction.server = server;
            }
            if let Some(model) = model {
                config.prediction.model = model;
            }
            if let Some(max_area) = max_area {
                config.max_area_sq_km = max_area;
            }

            if changed {
                // 未知の名前・不正な値は保存しない
                config.resolve()?;
                config.area_policy()?;
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                let p = &config.prediction;
                println!("設定:");
                println!("  サーバー: {}", p.server);
                println!("  モデル: {}", p.model);
                println!("  信頼度: {}", p.confidence);
                println!("  最小建物面積: {}", p.area_threshold);
                println!("  許容値: {}", p.tolerance);
                println!("  直交化: {}", if p.orthogonalize { "有効" } else { "無効" });
                println!("  面積上限: {} km²", config.max_area_sq_km);
                match config.timeout_seconds {
                    Some(secs) => println!("  タイムアウト: {}秒", secs),
                    None => println!("  タイムアウト: なし"),
                }
                println!("サーバー一覧:");
                for (name, url) in &config.deployment.servers {
                    println!("  {}: {}", name, url);
                }
                println!("モデル一覧:");
                for (name, path) in &config.deployment.models {
                    println!("  {}: {}", name, path);
                }
            }
        }
    }

    Ok(())
}
