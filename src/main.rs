use clap::Parser;
use fat12_reader::fs::fat_constants::SHORT_NAME_LEN;
use fat12_reader::fs::{short_name, BootSector, FileSystem, ImageDevice, MountError};
use fat12_reader::{logger, render};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Read a file out of a FAT12 disk image.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Disk image to read
    image: Option<PathBuf>,

    /// 8.3 name, padded to 11 bytes ("KERNEL  BIN") or dotted ("kernel.bin")
    name: Option<String>,

    /// List the root directory
    #[arg(short, long)]
    list: bool,

    /// Print the decoded boot sector
    #[arg(short, long)]
    info: bool,

    /// Print the file's cluster chain instead of its content
    #[arg(short, long)]
    chain: bool,

    /// Write the content bytes unescaped
    #[arg(short, long)]
    raw: bool,

    /// More log output (repeat for debug and trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Exit statuses scripts can rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    MissingArguments = 1,
    OpenImage = 2,
    BootSector = 3,
    Fat = 4,
    RootDirectory = 5,
    NotFound = 6,
    ReadFile = 7,
    Output = 8,
}

impl From<Failure> for ExitCode {
    fn from(f: Failure) -> Self { ExitCode::from(f as u8) }
}

impl From<&MountError> for Failure {
    fn from(e: &MountError) -> Self {
        match e {
            MountError::BootSector(_) => Failure::BootSector,
            MountError::Fat(_) => Failure::Fat,
            MountError::RootDirectory(_) => Failure::RootDirectory,
        }
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if !e.use_stderr() => {
            // --help and --version
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            return Failure::MissingArguments.into();
        }
    };
    if let Err(e) = logger::init(logger::level_for(args.verbose)) {
        eprintln!("logger init failed: {e}");
    }
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(f) => f.into(),
    }
}

/// Undotted names of exactly 11 bytes are taken as already padded.
fn padded_name(arg: &str) -> [u8; SHORT_NAME_LEN] {
    match <[u8; SHORT_NAME_LEN]>::try_from(arg.as_bytes()) {
        Ok(raw) if !arg.contains('.') => raw,
        _ => {
            let name = short_name(arg);
            log::debug!("'{arg}' looked up as '{}'", String::from_utf8_lossy(&name));
            name
        }
    }
}

fn run(args: &Args) -> Result<(), Failure> {
    let overview = args.list || args.info;
    let (Some(image), true) = (&args.image, args.name.is_some() || overview) else {
        log::error!("usage: fat12-reader <disk image> <file name>");
        return Err(Failure::MissingArguments);
    };

    let device = ImageDevice::open(image).map_err(|e| {
        log::error!("the disk image cannot be opened {}: {e}", image.display());
        Failure::OpenImage
    })?;
    let mut fs = FileSystem::mount(device).map_err(|e| {
        log::error!("{e}");
        Failure::from(&e)
    })?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let output_failed = |e: io::Error| {
        log::error!("writing output failed: {e}");
        Failure::Output
    };

    if args.info {
        print_info(&mut out, fs.boot_sector()).map_err(output_failed)?;
    }
    if args.list {
        for e in fs.list_root() {
            let kind = if e.is_directory() { "<DIR>" } else { "" };
            writeln!(out, "{:<12} {:>5} {:>10} {kind}", e.display_name(), e.first_cluster_low, e.size)
                .map_err(output_failed)?;
        }
    }

    let Some(name_arg) = &args.name else {
        return out.flush().map_err(output_failed);
    };
    let name = padded_name(name_arg);
    let Some(entry) = fs.find(&name) else {
        log::error!("file not found: {name_arg}");
        return Err(Failure::NotFound);
    };

    if args.chain {
        let chain = fs.cluster_chain(&entry).map_err(|e| {
            log::error!("failed to read cluster chain: {e}");
            Failure::ReadFile
        })?;
        let links: Vec<String> = chain.iter().map(|c| format!("{c:#05x}")).collect();
        writeln!(out, "{}", links.join(" -> ")).map_err(output_failed)?;
        return out.flush().map_err(output_failed);
    }

    let data = fs.read_file(&entry).map_err(|e| {
        log::error!("failed to read file: {e}");
        Failure::ReadFile
    })?;
    log::info!("read {} bytes from {}", data.len(), entry.display_name());

    if args.raw {
        out.write_all(&data).map_err(output_failed)?;
    } else {
        render::write_escaped(&mut out, &data).map_err(output_failed)?;
        writeln!(out).map_err(output_failed)?;
    }
    out.flush().map_err(output_failed)
}

fn print_info(out: &mut impl Write, bs: &BootSector) -> io::Result<()> {
    let text = |b: &[u8]| String::from_utf8_lossy(b).into_owned();
    writeln!(out, "OEM identifier:      {}", text(&bs.oem_id))?;
    writeln!(out, "bytes per sector:    {}", bs.bytes_per_sector)?;
    writeln!(out, "sectors per cluster: {}", bs.sectors_per_cluster)?;
    writeln!(out, "reserved sectors:    {}", bs.reserved_sectors)?;
    writeln!(out, "FAT count:           {}", bs.num_fats)?;
    writeln!(out, "root dir entries:    {}", bs.max_root_dir_entries)?;
    writeln!(out, "total sectors:       {}", bs.total_sectors)?;
    writeln!(out, "media descriptor:    {:#04x}", bs.media_descriptor)?;
    writeln!(out, "sectors per FAT:     {}", bs.sectors_per_fat)?;
    writeln!(out, "sectors per track:   {}", bs.sectors_per_track)?;
    writeln!(out, "heads:               {}", bs.heads)?;
    writeln!(out, "hidden sectors:      {}", bs.hidden_sectors)?;
    writeln!(out, "large sector count:  {}", bs.large_sector_count)?;
    writeln!(out, "drive number:        {:#04x}", bs.drive_number)?;
    writeln!(out, "signature:           {:#04x}", bs.signature)?;
    writeln!(out, "volume id:           {:#010x}", bs.volume_id)?;
    writeln!(out, "volume label:        {}", text(&bs.volume_label))?;
    writeln!(out, "system id:           {}", text(&bs.system_id))?;
    writeln!(out, "FAT lba:             {}", bs.fat_start_lba())?;
    writeln!(out, "root dir lba:        {}", bs.root_dir_start_lba())?;
    writeln!(out, "data lba:            {}", bs.data_start_lba())?;
    Ok(())
}
