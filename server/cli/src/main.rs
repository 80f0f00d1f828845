use std::io::Write;

use anyhow::Result;
use clap::Parser;
use gesture_core_kit::{
    config::GestureConfig,
    context::DeviceContext,
    gesture::GestureRecord,
    logger::init_tracing,
    sink::{EventSink, LogSink, expand},
    trace::{TraceReader, replay},
};
use tokio::io::BufReader;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "touchgesture", version = "0.1.0", about = "Replay multitouch frames through the gesture extractor", long_about = None)]
struct Cli {
    #[arg(short = 'c', long = "config")]
    config_file: Option<std::path::PathBuf>,
    /// 录制文件（JSON lines），不指定时从标准输入读取
    #[arg(short = 't', long = "trace")]
    trace_file: Option<std::path::PathBuf>,
    /// 以 JSON lines 格式把事件写到标准输出
    #[arg(long = "json")]
    json: bool,
}

/// 每个事件一行 JSON
struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> EventSink for JsonSink<W> {
    fn emit(&mut self, record: &GestureRecord) -> Result<()> {
        for event in expand(record) {
            serde_json::to_writer(&mut self.out, &event)?;
            self.out.write_all(b"\n")?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config_file {
        Some(path) => GestureConfig::from(path).map_err(|e| {
            eprintln!("Error: {}", e);
            e
        })?,
        None => GestureConfig::default(),
    };
    let _guard = init_tracing(config.log_level)?;
    info!("success to load config");

    let mut ctx = DeviceContext::new(config)?;
    let mut sink: Box<dyn EventSink> = if cli.json {
        Box::new(JsonSink {
            out: std::io::stdout(),
        })
    } else {
        Box::new(LogSink)
    };

    let stats = match &cli.trace_file {
        Some(path) => {
            let file = tokio::fs::File::open(path).await.map_err(|e| {
                error!("Failed to open trace {:?}: {}", path, e);
                e
            })?;
            replay(&mut ctx, TraceReader::new(BufReader::new(file)), sink.as_mut()).await?
        },
        None => {
            let stdin = tokio::io::stdin();
            replay(&mut ctx, TraceReader::new(BufReader::new(stdin)), sink.as_mut()).await?
        },
    };
    info!("{} frames replayed, {} gesture records", stats.frames, stats.records);
    Ok(())
}
