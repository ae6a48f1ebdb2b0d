mod args;
mod logging;
mod output;

use anyhow::Result;
use relaycheck::relay::{LettreConnector, RelayCredential, run_relay_test_with};

use crate::args::Cli;
use crate::output::ProgressPrinter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    // identifiants du compte de diagnostic, non configurables
    let credential = RelayCredential::builtin();
    let profiles = cli.profiles();
    let options = cli.relay_options();
    let addresses = cli.addresses();

    output::print_header(&options, &profiles, &credential, &addresses);

    let mut printer = ProgressPrinter::new(&credential, &addresses, &options.subject);
    let report = run_relay_test_with(
        &LettreConnector,
        &profiles,
        &credential,
        &addresses,
        &options,
        |event| printer.print(&event),
    );

    output::print_summary(&report);

    // codes de sortie : 0 au moins un port OK, 1 aucun
    std::process::exit(report.exit_code());
}
