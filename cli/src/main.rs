//! envparts - inspect partition tables declared in a firmware environment

mod env_file;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use env_file::EnvFile;
use envparts::{
    BlockDevice, DeviceClass, EnvKey, EnvPartition, EnvParts, EnvPartsConfig, PartitionDriver,
};
use gpt_disk_io::BlockIoAdapter;
use gpt_disk_types::BlockSize;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(about = "Inspect partition tables declared in a firmware environment")]
struct Cli {
    /// Environment in `name=value` lines, as printed by fw_printenv
    #[arg(short, long, value_name = "FILE")]
    env: Option<PathBuf>,

    /// Use this definition instead of looking it up in an environment file
    #[arg(short, long, conflicts_with = "env")]
    definition: Option<String>,

    /// Block device class
    #[arg(long, default_value = "mmc")]
    class: String,

    /// Device number within the class
    #[arg(long, default_value_t = 0)]
    dev: u32,

    /// Hardware partition (eMMC boot areas are 1 and 2)
    #[arg(long, default_value_t = 0)]
    hwpart: u32,

    /// Disk image whose size is the device capacity
    #[arg(short, long, value_name = "FILE", conflicts_with = "sectors")]
    image: Option<PathBuf>,

    /// Device capacity in 512-byte sectors
    #[arg(short, long)]
    sectors: Option<u64>,

    /// Fail instead of shrinking entries that reach past the disk
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the partition table
    List,
    /// Show one partition
    Info {
        /// Partition number, starting at 1
        part: u32,
    },
    /// Probe whether the device has a definition
    Test,
    /// Print the raw definition
    Show,
}

fn main() -> Result<()> {
    setup_tracing();

    let cli = Cli::parse();
    let stdout = io::stdout();
    run(&cli, &mut stdout.lock())
}

fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let config = if cli.strict {
        EnvPartsConfig::default().strict()
    } else {
        EnvPartsConfig::default()
    };

    let device = open_device(cli)?;
    let store = load_store(cli, &config, &device)?;
    let parts = EnvParts::with_config(store, config);

    match cli.command {
        Command::List => {
            let listing = parts.listing(&device);
            write!(out, "{}", listing)?;
            if let Some(e) = listing.failure() {
                return Err(e).with_context(|| format!("partition table of {} is invalid", device));
            }
        }
        Command::Info { part } => {
            let info = parts
                .get_info(&device, part)
                .with_context(|| format!("failed to resolve partition {} of {}", part, device))?;
            print_info(out, &info)?;
        }
        Command::Test => {
            if !PartitionDriver::test(&parts, &device) {
                bail!("{} has no {} partition table", device, EnvParts::<EnvFile>::NAME);
            }
            writeln!(out, "{}: {}", device, EnvParts::<EnvFile>::NAME)?;
        }
        Command::Show => {
            let definition = parts
                .definition(&device)
                .with_context(|| format!("no definition for {}", device))?;
            writeln!(out, "{}", definition)?;
        }
    }

    Ok(())
}

fn setup_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_device(cli: &Cli) -> Result<BlockDevice> {
    let class = DeviceClass::from_name(&cli.class)
        .ok_or_else(|| anyhow!("unknown device class '{}'", cli.class))?;

    let device = match (&cli.image, cli.sectors) {
        (Some(path), _) => measure_image(class, cli.dev, path)?,
        (None, Some(sectors)) => BlockDevice::new(class, cli.dev, sectors),
        (None, None) => bail!("device capacity unknown: pass --image or --sectors"),
    };

    Ok(device.with_hwpart(cli.hwpart))
}

fn measure_image(class: DeviceClass, devnum: u32, path: &Path) -> Result<BlockDevice> {
    let file =
        File::open(path).with_context(|| format!("failed to open image {}", path.display()))?;
    let mut block_io = BlockIoAdapter::new(&file, BlockSize::BS_512);
    let device = BlockDevice::from_block_io(class, devnum, &mut block_io)
        .map_err(|e| anyhow!("failed to measure {}: {}", path.display(), e))?;
    tracing::debug!("{} has {} sectors", path.display(), device.num_blocks);
    Ok(device)
}

fn load_store(cli: &Cli, config: &EnvPartsConfig, device: &BlockDevice) -> Result<EnvFile> {
    match (&cli.env, &cli.definition) {
        (Some(path), _) => EnvFile::load(path),
        (None, Some(definition)) => {
            let key = EnvKey::for_device(config.key_prefix, device.class, device.devnum)?;
            let mut env = EnvFile::default();
            env.set(key.as_str(), definition);
            Ok(env)
        }
        (None, None) => bail!("no partition definition: pass --env or --definition"),
    }
}

fn print_info(out: &mut impl Write, info: &EnvPartition) -> io::Result<()> {
    writeln!(out, "Partition {}", info.index)?;
    writeln!(out, "  Name:         {}", info.name)?;
    writeln!(out, "  Start sector: {}", info.start_lba().0)?;
    match info.end_lba() {
        Some(end) => writeln!(out, "  End sector:   {}", end.0)?,
        None => writeln!(out, "  End sector:   -")?,
    }
    writeln!(out, "  Num sectors:  {}", info.size)?;
    writeln!(
        out,
        "  Size:         {} MiB ({} bytes, {}-byte sectors)",
        info.size_mb(),
        info.size_bytes(),
        info.blksz().to_u64()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use envparts::EnvStore;
    use std::fs;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("envparts").chain(args.iter().copied())).unwrap()
    }

    fn run_to_string(cli: &Cli) -> (Result<()>, String) {
        let mut out = Vec::new();
        let result = run(cli, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_measure_image() {
        let image = tempfile::NamedTempFile::new().unwrap();
        image.as_file().set_len(8 * 1024 * 1024).unwrap();

        let device = measure_image(DeviceClass::Mmc, 1, image.path()).unwrap();
        assert_eq!(device.num_blocks, 16_384);
        assert_eq!(device.devnum, 1);
        assert_eq!(device.capacity_bytes(), 8 * 1024 * 1024);
    }

    #[test]
    fn test_measure_read_only_image() {
        let image = tempfile::NamedTempFile::new().unwrap();
        image.as_file().set_len(1024 * 1024).unwrap();
        let mut perms = fs::metadata(image.path()).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(image.path(), perms).unwrap();

        let device = measure_image(DeviceClass::Mmc, 0, image.path()).unwrap();
        assert_eq!(device.num_blocks, 2048);
    }

    #[test]
    fn test_missing_image() {
        let dir = tempfile::tempdir().unwrap();
        let err = measure_image(DeviceClass::Mmc, 0, &dir.path().join("none.img")).unwrap_err();
        assert!(err.to_string().contains("failed to open image"));
    }

    #[test]
    fn test_definition_stored_under_device_key() {
        let cli = cli(&["--definition", "1M(boot),-(rootfs)", "--dev", "3", "-s", "4096", "list"]);
        let device = open_device(&cli).unwrap();
        let store = load_store(&cli, &EnvPartsConfig::default(), &device).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("envparts_mmc3"), Some("1M(boot),-(rootfs)"));
        assert_eq!(store.get("envparts_mmc0"), None);
    }

    #[test]
    fn test_unknown_class_rejected() {
        let cli = cli(&["--class", "floppy", "-d", "1M", "-s", "2048", "list"]);
        let err = open_device(&cli).unwrap_err();
        assert!(err.to_string().contains("unknown device class 'floppy'"));
    }

    #[test]
    fn test_capacity_required() {
        let cli = cli(&["-d", "1M", "list"]);
        let err = open_device(&cli).unwrap_err();
        assert!(err.to_string().contains("--image or --sectors"));
    }

    #[test]
    fn test_definition_required() {
        let cli = cli(&["-s", "2048", "list"]);
        let device = open_device(&cli).unwrap();
        assert!(load_store(&cli, &EnvPartsConfig::default(), &device).is_err());
    }

    #[test]
    fn test_list() {
        let cli = cli(&["-d", "1M(boot),-(rootfs)", "-s", "131072", "list"]);
        let (result, out) = run_to_string(&cli);
        result.unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "  2\t2048      \t129024    \trootfs");
    }

    #[test]
    fn test_list_broken_table_fails() {
        let cli = cli(&["-d", "1M(a),1000(bad),1M(c)", "-s", "131072", "list"]);
        let (result, out) = run_to_string(&cli);

        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("partition 2's size 1000"));
        // rows up to the failing entry are still printed
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_info_from_image() {
        let dir = tempfile::tempdir().unwrap();
        let env = dir.path().join("env.txt");
        fs::write(&env, "bootdelay=2\nenvparts_mmc0=1M(boot),-(rootfs)\n").unwrap();
        let image = dir.path().join("disk.img");
        File::create(&image).unwrap().set_len(8 * 1024 * 1024).unwrap();

        let cli = cli(&[
            "--env",
            env.to_str().unwrap(),
            "--image",
            image.to_str().unwrap(),
            "info",
            "2",
        ]);
        let (result, out) = run_to_string(&cli);
        result.unwrap();
        assert!(out.contains("Name:         rootfs"));
        assert!(out.contains("Start sector: 2048"));
        assert!(out.contains("Num sectors:  14336"));
    }

    #[test]
    fn test_refused_boot_area() {
        let cli = cli(&["-d", "1M", "-s", "2048", "--hwpart", "1", "test"]);
        let (result, out) = run_to_string(&cli);
        assert!(result.is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_show() {
        let cli = cli(&["--definition=-(all)", "-s", "2048", "show"]);
        let (result, out) = run_to_string(&cli);
        result.unwrap();
        assert_eq!(out, "-(all)\n");
    }
}
