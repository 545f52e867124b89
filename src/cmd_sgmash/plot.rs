use clap::*;
use itertools::Itertools;

use sgmash::libs::{chart, dist};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("plot")
        .about("Renders a filtered table as a scatter/spline chart")
        .after_help(
            r###"
This command consumes a pre-calculated filtered table (`.filter.Gadd`,
columns Rchr / Qchr / Subg / MashD) and renders a PNG chart: one x position
per reference chromosome in natural sort order, one colored series per
subgenome, trend lines, per-chromosome connectors and query labels.

Notes:
* The subgenome count defaults to the number of distinct Subg labels
* The default output name replaces the table's last extension with .png

Examples:
1. Auto-detect subgenomes:
   sgmash plot Ath_Bna_mashDistance.filter.Gadd

2. Explicit count and output:
   sgmash plot Ath_Bna_mashDistance.filter.Gadd -s 4 -o cmp.png

"###,
        )
        .arg(
            Arg::new("data_file")
                .required(true)
                .index(1)
                .help("Filtered table (.filter.Gadd)"),
        )
        .arg(
            Arg::new("subgenomes")
                .long("subgenomes")
                .short('s')
                .value_parser(value_parser!(usize))
                .num_args(1)
                .help("Number of subgenomes [default: detect from data]"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .help("Output PNG filename"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let data_file = args.get_one::<String>("data_file").unwrap();

    let records = dist::read_filtered(sgmash::reader(data_file)?)?;

    let n_subgenomes = match args.get_one::<usize>("subgenomes") {
        Some(n) => *n,
        None => records.iter().map(|r| r.subg.as_str()).unique().count(),
    };
    if n_subgenomes < 1 || n_subgenomes > super::calculate::MAX_SUBGENOMES {
        anyhow::bail!(
            "--subgenomes must be between 1 and {}",
            super::calculate::MAX_SUBGENOMES
        );
    }

    let outfile = match args.get_one::<String>("outfile") {
        Some(outfile) => outfile.to_string(),
        None => format!("{}.png", dist::file_stem(data_file)),
    };

    chart::render(&records, n_subgenomes, &outfile)
        .map_err(|e| anyhow::anyhow!("chart rendering failed: {}", e))?;
    eprintln!("Chart saved to {}", outfile);

    Ok(())
}
