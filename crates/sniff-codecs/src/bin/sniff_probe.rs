//! `sniff_probe`：判定文件或标准输入的结构化编码格式。
//!
//! # 使用方式（How）
//! - `sniff_probe <path>`：探测文件；省略路径或传入 `-` 时读取标准输入；
//! - `SNIFF_PROBE_CONFIG=<path>` 指向分发器 TOML 配置（可选）；
//! - 日志级别由 `RUST_LOG` 控制，例如 `RUST_LOG=sniff_codecs=debug`。
//!
//! # 输出契约（What）
//! - 成功时向标准输出打印一行 `<name>\t<media type>`，退出码为 0；
//! - 无法判定或读取失败时向标准错误打印错误码与描述，退出码为 1。

use std::{env, fs, io, process};

use sniff_codecs::{ContentError, FormatRegistry};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok((name, media_type)) => println!("{name}\t{media_type}"),
        Err(error) => {
            eprintln!("sniff_probe: [{}] {error}", error.code());
            process::exit(1);
        }
    }
}

fn run() -> Result<(&'static str, &'static str), ContentError> {
    let registry = match env::var("SNIFF_PROBE_CONFIG") {
        Ok(path) => FormatRegistry::from_toml_str(&fs::read_to_string(path)?)?,
        Err(_) => FormatRegistry::default(),
    };

    let codec = match env::args_os().nth(1) {
        Some(path) if path != "-" => registry.content_for_reader(fs::File::open(path)?)?.0,
        _ => registry.content_for_reader(io::stdin().lock())?.0,
    };
    Ok((codec.format().name(), codec.media_type()))
}
