//! # 精灵图转 GIF 工具 — 命令行入口
//!
//! 本文件仅负责参数解析、日志初始化与结果落盘。
//! 业务逻辑分布在 `gif_handler` 子模块中，详见 `lib.rs` 架构文档。
//!
//! ```text
//! sprite-gif generate <sheet.png|jpg|jpeg> --frame-width N --frame-height N --delay MS
//!                     [--background #hex] [--out DIR] [--config FILE] [--profile NAME]
//! sprite-gif repair <anim.gif> [--out DIR] [--config FILE]
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde_json::json;
use sprite_gif::error::AppError;
use sprite_gif::gif_handler::{
    output_file_name, GenerateRequest, GenerationOutcome, GifConfig, GifServiceState, InputSource,
};
use sprite_gif::settings;

const USAGE: &str = "用法:
  sprite-gif generate <sheet> --frame-width N --frame-height N --delay MS [--background #hex] [--out DIR] [--config FILE] [--profile quality|balanced|speed]
  sprite-gif repair <file.gif> [--out DIR] [--config FILE]";

/// 解析后的命令行参数。
struct CliArgs {
    command: String,
    input: String,
    options: HashMap<String, String>,
}

impl CliArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, AppError> {
        let command = args.next().ok_or_else(|| AppError::Usage(USAGE.to_string()))?;
        let mut input = None;
        let mut options = HashMap::new();

        while let Some(arg) = args.next() {
            if let Some(name) = arg.strip_prefix("--") {
                let value = args
                    .next()
                    .ok_or_else(|| AppError::Usage(format!("选项 --{} 缺少取值", name)))?;
                options.insert(name.to_string(), value);
            } else if input.is_none() {
                input = Some(arg);
            } else {
                return Err(AppError::Usage(format!("多余的参数: {}", arg)));
            }
        }

        let input = input.ok_or_else(|| AppError::Usage(format!("缺少输入文件\n{}", USAGE)))?;
        Ok(Self { command, input, options })
    }

    fn required_u32(&self, name: &str) -> Result<u32, AppError> {
        let value = self
            .options
            .get(name)
            .ok_or_else(|| AppError::Usage(format!("缺少必填选项 --{}", name)))?;
        value
            .parse::<u32>()
            .map_err(|_| AppError::Usage(format!("--{} 必须为正整数: {}", name, value)))
    }

    fn out_dir(&self) -> PathBuf {
        self.options
            .get("out")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn load_config(args: &CliArgs) -> Result<GifConfig, AppError> {
    match args.options.get("config") {
        Some(path) => settings::load_config(Path::new(path))?
            .ok_or_else(|| AppError::Settings(format!("设置文件不存在: {}", path))),
        None => Ok(GifConfig::default()),
    }
}

/// 输出路径：`<out>/<输入文件名>.gif`，拒绝覆盖输入文件本身。
fn output_path(args: &CliArgs) -> Result<PathBuf, AppError> {
    let path = args.out_dir().join(output_file_name(&args.input)?);
    let same_as_input = match (path.canonicalize(), Path::new(&args.input).canonicalize()) {
        (Ok(out), Ok(input)) => out == input,
        _ => false,
    };
    if same_as_input {
        return Err(AppError::Usage(format!(
            "输出文件会覆盖输入文件: {}（请使用 --out 指定其他目录）",
            path.display()
        )));
    }
    Ok(path)
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

async fn run_generate(service: &GifServiceState, args: &CliArgs) -> Result<serde_json::Value, AppError> {
    if let Some(profile) = args.options.get("profile") {
        service.set_performance_profile(profile)?;
    }

    let request = GenerateRequest {
        source: InputSource::FilePath(args.input.clone()),
        frame_width: args.required_u32("frame-width")?,
        frame_height: args.required_u32("frame-height")?,
        delay_ms: args.required_u32("delay")?,
        background: args.options.get("background").cloned(),
    };

    match service.generate(request).await? {
        GenerationOutcome::Generated(gif) => {
            let path = output_path(args)?;
            write_output(&path, &gif.bytes)?;
            Ok(json!({
                "status": "generated",
                "output": path.display().to_string(),
                "size_bytes": gif.bytes.len(),
                "gif": gif,
            }))
        }
        GenerationOutcome::Empty { image_width, image_height } => {
            log::warn!(
                "⚠️ 未生成任何帧：图片 {}x{} 小于帧尺寸",
                image_width,
                image_height
            );
            Ok(json!({
                "status": "empty",
                "image_width": image_width,
                "image_height": image_height,
            }))
        }
    }
}

async fn run_repair(service: &GifServiceState, args: &CliArgs) -> Result<serde_json::Value, AppError> {
    let outcome = service
        .repair(InputSource::FilePath(args.input.clone()))
        .await?;
    let path = output_path(args)?;
    write_output(&path, &outcome.bytes)?;

    Ok(json!({
        "status": "repaired",
        "output": path.display().to_string(),
        "trimmed_bytes": outcome.trimmed,
        "size_bytes": outcome.bytes.len(),
    }))
}

async fn run(args: CliArgs) -> Result<serde_json::Value, AppError> {
    let service = GifServiceState::with_config(load_config(&args)?)?;

    match args.command.as_str() {
        "generate" => run_generate(&service, &args).await,
        "repair" => run_repair(&service, &args).await,
        other => Err(AppError::Usage(format!("未知命令: {}\n{}", other, USAGE))),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(args) => run(args).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(summary) => {
            println!("{}", summary);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("❌ [{}] {}", err.code(), err);
            println!("{}", json!({ "status": "failed", "code": err.code(), "error": err }));
            ExitCode::FAILURE
        }
    }
}
