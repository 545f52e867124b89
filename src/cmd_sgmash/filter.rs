use clap::*;

use sgmash::libs::dist;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("filter")
        .about("Keeps the N closest query chromosomes per reference chromosome")
        .after_help(
            r###"
This command reads a raw `mash dist` table (reference-path, query-path,
distance, p-value, matching-hashes) and keeps, for each reference chromosome,
the N rows with the smallest distance, ranked SG1..SGN by ascending distance.
Chromosome names are the shard file stems.

Notes:
* Reads from stdin if input file is 'stdin'
* An already-filtered table (header `Rchr ...`) is accepted and re-filtered;
  with the same N this reproduces the input
* Ties are kept in input order
* Output is sorted by (reference chromosome, distance)

Examples:
1. Diploid:
   sgmash filter Ath_Bna_mashDistance -o Ath_Bna_mashDistance.filter.Gadd

2. Tetraploid, to the screen:
   sgmash filter Ath_Bna_mashDistance -s 4

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .index(1)
                .help("Raw distance table. [stdin] for screen"),
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
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let infile = args.get_one::<String>("infile").unwrap();
    let subgenomes = *args.get_one::<usize>("subgenomes").unwrap();

    if subgenomes < 1 || subgenomes > super::calculate::MAX_SUBGENOMES {
        anyhow::bail!(
            "--subgenomes must be between 1 and {}",
            super::calculate::MAX_SUBGENOMES
        );
    }

    let records = dist::read_records(sgmash::reader(infile)?)?;
    let filtered = dist::filter_closest(&records, subgenomes);

    let writer = sgmash::writer(args.get_one::<String>("outfile").unwrap())?;
    dist::write_table(writer, &filtered)?;

    Ok(())
}
