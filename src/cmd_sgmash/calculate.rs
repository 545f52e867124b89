use clap::*;
use cmd_lib::*;
use std::fs;
use std::io::Write;
use std::process::Stdio;

use sgmash::libs::dist;

pub const MAX_SUBGENOMES: usize = 10;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    pipeline_args(Command::new("calculate").about("Split genomes, run Mash and filter distances"))
        .after_help(
            r###"
This command runs the calculation half of the pipeline:

1. Split reference and query FASTA files into one-sequence shards (seqkit)
2. Build a Mash sketch database over the reference shards
3. Calculate Mash distances, reference sketch vs. query shards
4. Keep the N closest query chromosomes per reference chromosome

All intermediate and result files are written to the current directory:

* <abb>_split/           - one-sequence FASTA shards
* <abb>.chrList          - absolute paths of the shards
* <ref_abb>.msh          - Mash sketch database
* <ref_abb>_<qry_abb>_mashDistance             - raw distance table
* <ref_abb>_<qry_abb>_mashDistance.filter.Gadd - filtered table

This pipeline depends on two binaries, `seqkit` and `mash`, both in PATH.

Examples:
1. Diploid query:
   sgmash calculate Ath ath.fa Aly aly.fa

2. Tetraploid query, 8 mash threads:
   sgmash calculate Ath ath.fa Bna bna.fa -s 4 -t 8

"###,
        )
}

pub fn pipeline_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("ref_abb")
            .required(true)
            .index(1)
            .help("Reference genome abbreviation"),
    )
    .arg(
        Arg::new("ref_fasta")
            .required(true)
            .index(2)
            .help("Path to reference genome FASTA"),
    )
    .arg(
        Arg::new("qry_abb")
            .required(true)
            .index(3)
            .help("Query genome abbreviation"),
    )
    .arg(
        Arg::new("qry_fasta")
            .required(true)
            .index(4)
            .help("Path to query genome FASTA"),
    )
    .arg(
        Arg::new("subgenomes")
            .long("subgenomes")
            .short('s')
            .value_parser(value_parser!(usize))
            .num_args(1)
            .default_value("2")
            .help("Number of subgenomes to consider (1-10)"),
    )
    .arg(
        Arg::new("threads")
            .long("threads")
            .short('t')
            .value_parser(value_parser!(usize))
            .num_args(1)
            .default_value("4")
            .help("Number of threads forwarded to mash"),
    )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    run(args)?;
    Ok(())
}

/// Runs the calculation pipeline and returns the path of the filtered table.
pub fn run(args: &ArgMatches) -> anyhow::Result<String> {
    //----------------------------
    // Args
    //----------------------------
    let ref_abb = args.get_one::<String>("ref_abb").unwrap();
    let ref_fasta = args.get_one::<String>("ref_fasta").unwrap();
    let qry_abb = args.get_one::<String>("qry_abb").unwrap();
    let qry_fasta = args.get_one::<String>("qry_fasta").unwrap();
    let subgenomes = *args.get_one::<usize>("subgenomes").unwrap();
    let threads = *args.get_one::<usize>("threads").unwrap();

    if subgenomes < 1 || subgenomes > MAX_SUBGENOMES {
        anyhow::bail!("--subgenomes must be between 1 and {}", MAX_SUBGENOMES);
    }

    for tool in ["seqkit", "mash"] {
        if which::which(tool).is_err() {
            anyhow::bail!("{} not found in PATH. Please install {} first.", tool, tool);
        }
    }

    //----------------------------
    // Operating
    //----------------------------
    run_cmd!(echo "==> Split genomes")?;
    split_fasta(ref_fasta, &format!("{}_split", ref_abb))?;
    split_fasta(qry_fasta, &format!("{}_split", qry_abb))?;

    run_cmd!(echo "==> Shard lists")?;
    let ref_list = write_chr_list(ref_abb)?;
    let qry_list = write_chr_list(qry_abb)?;

    run_cmd!(echo "==> mash sketch")?;
    mash_sketch(&ref_list, ref_abb, threads)?;

    run_cmd!(echo "==> mash dist")?;
    let dist_file = format!("{}_{}_mashDistance", ref_abb, qry_abb);
    mash_dist(&format!("{}.msh", ref_abb), &qry_list, &dist_file, threads)?;

    run_cmd!(echo "==> Filter closest chromosomes")?;
    let records = dist::read_records(sgmash::reader(&dist_file)?)?;
    let filtered = dist::filter_closest(&records, subgenomes);

    let filter_file = format!("{}.filter.Gadd", dist_file);
    dist::write_table(sgmash::writer(&filter_file)?, &filtered)?;
    run_cmd!(echo "    filtered table saved to ${filter_file}")?;

    Ok(filter_file)
}

fn split_fasta(infile: &str, outdir: &str) -> anyhow::Result<()> {
    fs::create_dir_all(outdir)?;

    let status = std::process::Command::new("seqkit")
        .args(["split", "-f", "-i", "--by-id-prefix", ""])
        .arg("--out-dir")
        .arg(outdir)
        .arg(infile)
        .stdout(Stdio::null())
        .status()?;
    if !status.success() {
        anyhow::bail!("seqkit split failed for {}", infile);
    }

    Ok(())
}

fn write_chr_list(abb: &str) -> anyhow::Result<String> {
    let outfile = format!("{}.chrList", abb);

    let mut paths = vec![];
    for entry in fs::read_dir(format!("{}_split", abb))? {
        paths.push(entry?.path());
    }
    paths.sort();

    let mut writer = sgmash::writer(&outfile)?;
    for path in &paths {
        writer.write_fmt(format_args!("{}\n", path.canonicalize()?.display()))?;
    }

    Ok(outfile)
}

fn mash_sketch(chr_list: &str, db_name: &str, threads: usize) -> anyhow::Result<()> {
    let status = std::process::Command::new("mash")
        .arg("sketch")
        .args(["-p", &threads.to_string()])
        .args(["-k", "31"])
        .args(["-s", "5000000000"])
        .args(["-l", chr_list])
        .args(["-o", db_name])
        .status()?;
    if !status.success() {
        anyhow::bail!("mash sketch failed for {}", chr_list);
    }

    Ok(())
}

fn mash_dist(db_msh: &str, qry_list: &str, outfile: &str, threads: usize) -> anyhow::Result<()> {
    let file = fs::File::create(outfile)?;

    let status = std::process::Command::new("mash")
        .arg("dist")
        .arg(db_msh)
        .args(["-p", &threads.to_string()])
        .args(["-s", "5000000000"])
        .args(["-l", qry_list])
        .stdout(file)
        .status()?;
    if !status.success() {
        anyhow::bail!("mash dist failed for {} vs {}", db_msh, qry_list);
    }

    Ok(())
}
