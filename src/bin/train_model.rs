use clap::Parser;
use vertex_automl::config::cli::TrainArgs;
use vertex_automl::utils::{logger, validation::Validate};
use vertex_automl::{app, TrainModelStage, PlatformContext, StageRunner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = TrainArgs::parse();

    // 初始化日誌
    if args.common.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.common.verbose);
    }

    // 解析並驗證配置
    let settings = match args.resolve().and_then(|s| s.validate().map(|_| s)) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let result = async {
        let ctx = PlatformContext::connect(&settings.platform)?;
        let stage = TrainModelStage::new(settings, ctx.vertex, ctx.storage);
        StageRunner::new(stage).run().await
    }
    .await;

    if let Err(e) = result {
        let exit_code = app::report_failure(&e);
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
