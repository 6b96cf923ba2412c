use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use triangulator::{codec, Error, Triangulator, TriangulatorConfig};

/// 读取点集二进制文件，输出三角网格二进制
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// 点集文件（u32 数量 + f32 坐标对，小端）
    #[arg(value_name = "INPUT")]
    input: PathBuf,
    /// 输出文件，缺省时写到标准输出
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// 外接圆测试容差（归一化坐标）
    #[arg(short, long)]
    epsilon: Option<f64>,
    /// 工作三角形数量超过该值时并行扫描
    #[arg(short, long)]
    parallel_threshold: Option<usize>,
    /// 只打印统计信息，不输出网格字节
    #[arg(short, long, default_value_t = false)]
    summary: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// 命令行失败，显示时带上稳定的失败标签
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("IO_ERROR: {0}")]
    Io(#[from] std::io::Error),

    #[error("{}: {}", .0.kind(), .0)]
    Pipeline(#[from] Error),
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let mut config = TriangulatorConfig::default();
    if let Some(epsilon) = cli.epsilon {
        config = config.with_circumcircle_epsilon(epsilon);
    }
    if let Some(threshold) = cli.parallel_threshold {
        config = config.with_parallel_threshold(threshold);
    }
    let triangulator = Triangulator::new(config).map_err(Error::from)?;

    let bytes = std::fs::read(&cli.input)?;
    log::info!("read {} bytes from {}", bytes.len(), cli.input.display());

    if cli.summary {
        let point_set = codec::decode_point_set(&bytes).map_err(Error::from)?;
        let count = point_set.count();
        let mesh = triangulator
            .triangulate(point_set)
            .map_err(Error::from)?;
        println!("Triangulation summary:");
        println!("  Points: {count}");
        println!("  Triangles: {}", mesh.triangle_count());
        if let Some(bounds) = mesh.point_set().bounds() {
            println!("  Bounds: {:.3} x {:.3}", bounds.width(), bounds.height());
        }
        return Ok(());
    }

    let encoded = triangulator.triangulate_bytes(&bytes)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, &encoded)?;
            log::info!("wrote {} bytes to {}", encoded.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&encoded)?;
            stdout.flush()?;
        }
    }

    Ok(())
}
