use std::time::Duration;

use clap::{ArgAction, Parser};
use relaycheck::Address;
use relaycheck::relay::{Addresses, PortProfile, RelayTestOptions};

#[derive(Parser, Debug)]
#[command(
    name = "relaycheck-cli",
    about = "Teste des identifiants de relais SMTP sur un ou plusieurs ports"
)]
pub struct Cli {
    /// adresse du serveur SMTP
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// adresse de l'expéditeur
    #[arg(long = "from-email", value_parser = parse_address)]
    pub from_email: Address,

    /// adresse du destinataire
    #[arg(long = "to-email", value_parser = parse_address)]
    pub to_email: Address,

    /// teste un seul port (465 => TLS implicite, 587 => STARTTLS, sinon clair)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// sujet du message de test
    #[arg(long)]
    pub subject: Option<String>,

    /// nom utilisé pour EHLO
    #[arg(long)]
    pub helo: Option<String>,

    /// timeout de la sonde TCP (ms)
    #[arg(long = "probe-timeout-ms", default_value_t = 5_000)]
    pub probe_timeout_ms: u64,

    /// timeout de connexion SMTP (ms)
    #[arg(long = "connect-timeout-ms", default_value_t = 10_000)]
    pub connect_timeout_ms: u64,

    /// verbosité des logs sur stderr (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn profiles(&self) -> Vec<PortProfile> {
        match self.port {
            Some(port) => vec![PortProfile::for_port(port)],
            None => PortProfile::default_set(),
        }
    }

    pub fn relay_options(&self) -> RelayTestOptions {
        let mut options = RelayTestOptions::new(self.host.clone())
            .with_probe_timeout(Duration::from_millis(self.probe_timeout_ms))
            .with_connect_timeout(Duration::from_millis(self.connect_timeout_ms));
        if let Some(subject) = &self.subject {
            options = options.with_subject(subject.clone());
        }
        if let Some(helo) = &self.helo {
            options = options.with_helo_name(helo.clone());
        }
        options
    }

    pub fn addresses(&self) -> Addresses {
        Addresses::new(self.from_email.clone(), self.to_email.clone())
    }
}

fn parse_address(raw: &str) -> Result<Address, String> {
    raw.trim()
        .parse::<Address>()
        .map_err(|err| format!("adresse invalide '{raw}': {err}"))
}
