use clap::*;

use sgmash::libs::{chart, dist};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    super::calculate::pipeline_args(
        Command::new("all").about("Runs the complete pipeline, calculation and chart"),
    )
    .after_help(
        r###"
Runs `sgmash calculate` and then renders the filtered table, equivalent to:

    sgmash calculate <ref_abb> <ref.fa> <qry_abb> <qry.fa> -s N -t N
    sgmash plot <ref_abb>_<qry_abb>_mashDistance.filter.Gadd -s N

This pipeline depends on two binaries, `seqkit` and `mash`, both in PATH.

Examples:
1. Tetraploid query:
   sgmash all Ath ath.fa Bna bna.fa -s 2 -t 8 -o Ath_Bna.png

"###,
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
    let filter_file = super::calculate::run(args)?;

    let records = dist::read_filtered(sgmash::reader(&filter_file)?)?;
    let n_subgenomes = *args.get_one::<usize>("subgenomes").unwrap();

    let outfile = match args.get_one::<String>("outfile") {
        Some(outfile) => outfile.to_string(),
        None => format!("{}.png", filter_file),
    };

    chart::render(&records, n_subgenomes, &outfile)
        .map_err(|e| anyhow::anyhow!("chart rendering failed: {}", e))?;
    eprintln!("Chart saved to {}", outfile);

    Ok(())
}
