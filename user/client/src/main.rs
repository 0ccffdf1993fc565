//! 内省端点的命令行客户端
//!
//! - `client -vma <pid>`：把 PID 写入 `vma_arg`，再读取 `vma`；
//! - `client -netdev`：读取 `netdev`。
//!
//! 服务返回的文本原样打印。收到哨兵时同样打印，但以状态码 1 退出。

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgGroup, CommandFactory, Parser};
use uapi::introspect::{
    BUFFER_SIZE, DEBUGFS_DIR_NAME, DEBUGFS_MOUNT_POINT, NETDEV_FILE_NAME, SENTINEL,
    VMA_ARG_FILE_NAME, VMA_FILE_NAME,
};

#[derive(Parser, Debug)]
#[command(name = "client", version, about = "Query the introspect debugfs endpoints")]
#[command(group(ArgGroup::new("query").required(true).args(["vma", "netdev"])))]
struct Cli {
    /// Print the memory regions of this process
    #[arg(long, value_name = "PID", allow_negative_numbers = true)]
    vma: Option<i32>,

    /// Print the network device registry
    #[arg(long)]
    netdev: bool,

    /// Directory holding the endpoint files
    #[arg(long, env = "INTROSPECT_ROOT", default_value_os_t = default_root())]
    root: PathBuf,
}

fn default_root() -> PathBuf {
    Path::new(DEBUGFS_MOUNT_POINT).join(DEBUGFS_DIR_NAME)
}

/// 一次查询
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Query {
    Vma(i32),
    NetDev,
}

impl Cli {
    fn query(&self) -> Query {
        match self.vma {
            Some(pid) => Query::Vma(pid),
            None => Query::NetDev,
        }
    }
}

/// 单横线的 `-vma`/`-netdev` 转成 clap 认识的长选项
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some("-vma") => OsString::from("--vma"),
            Some("-netdev") => OsString::from("--netdev"),
            _ => arg,
        })
        .collect()
}

fn run(root: &Path, query: Query) -> Result<String> {
    match query {
        Query::Vma(pid) => {
            write_target(&root.join(VMA_ARG_FILE_NAME), pid)?;
            read_once(&root.join(VMA_FILE_NAME))
        }
        Query::NetDev => read_once(&root.join(NETDEV_FILE_NAME)),
    }
}

/// 写入 `<pid>\n` 后立即关闭
fn write_target(path: &Path, pid: i32) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .open(path)
        .with_context(|| format!("cannot open {}", path.display()))?;
    file.write_all(format!("{pid}\n").as_bytes())
        .with_context(|| format!("cannot write {}", path.display()))
}

/// 端点只接受一次读取，缓冲区一次给足
fn read_once(path: &Path) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mut buf = vec![0u8; BUFFER_SIZE];
    let n = file
        .read(&mut buf)
        .with_context(|| format!("cannot read {}", path.display()))?;
    buf.truncate(n);
    String::from_utf8(buf).with_context(|| format!("{} returned invalid UTF-8", path.display()))
}

fn exit_code_for(text: &str) -> ExitCode {
    if text == SENTINEL {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    match run(&cli.root, cli.query()) {
        Ok(text) => {
            print!("{text}");
            exit_code_for(&text)
        }
        Err(err) => {
            eprintln!("client: {err:#}");
            eprintln!("{}", Cli::command().render_usage());
            ExitCode::FAILURE
        }
    }
}
