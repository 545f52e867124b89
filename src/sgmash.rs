extern crate clap;
use clap::*;

mod cmd_sgmash;

fn main() -> anyhow::Result<()> {
    let app = Command::new("sgmash")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`sgmash` - Subgenome assignment by Mash chromosome distances")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd_sgmash::all::make_subcommand())
        .subcommand(cmd_sgmash::calculate::make_subcommand())
        .subcommand(cmd_sgmash::filter::make_subcommand())
        .subcommand(cmd_sgmash::plot::make_subcommand())
        .after_help(
            r###"Subcommands:

* all       - split, sketch, dist, filter and plot in one go
* calculate - run the external tools and save the filtered table
* filter    - filter a pre-existing raw distance table
* plot      - render a pre-calculated filtered table

External dependencies (must be in PATH for `all` and `calculate`):

* seqkit - splits assemblies into one-sequence shards
* mash   - k-mer sketch distances between shards

"###,
        );

    // Check which subcomamnd the user ran...
    match app.get_matches().subcommand() {
        Some(("all", sub_matches)) => cmd_sgmash::all::execute(sub_matches),
        Some(("calculate", sub_matches)) => cmd_sgmash::calculate::execute(sub_matches),
        Some(("filter", sub_matches)) => cmd_sgmash::filter::execute(sub_matches),
        Some(("plot", sub_matches)) => cmd_sgmash::plot::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
