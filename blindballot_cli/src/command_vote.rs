use crate::receipts::FileStore;
use crate::rest::HttpClient;
use blindballot::{bigint_to_base64, BallotSession, ReceiptStore};
use rand::rngs::OsRng;
use std::path::Path;

pub fn command_vote(matches: &clap::ArgMatches, uri: &str, session: Option<String>, receipts: &str) {
    // Unwraps are OK, these args are required
    let mut params = crate::read_params(matches.value_of("params").unwrap());

    let option: usize = matches.value_of("option").unwrap().parse().unwrap_or_else(|e| {
        eprintln!("blindballot vote: invalid --option: {}", e);
        std::process::exit(1);
    });

    if let Some(options) = matches.value_of("options") {
        params.options_amount = options.parse().unwrap_or_else(|e| {
            eprintln!("blindballot vote: invalid --options: {}", e);
            std::process::exit(1);
        });
    }

    let user: serde_json::Value = serde_json::from_str(matches.value_of("user").unwrap())
        .unwrap_or_else(|e| {
            eprintln!("blindballot vote: --user must be JSON: {}", e);
            std::process::exit(1);
        });

    let mut store = FileStore::load(Path::new(receipts)).unwrap_or_else(|e| {
        eprintln!("blindballot vote: unable to read {}: {}", receipts, e);
        std::process::exit(1);
    });

    let voting_id = params.voting_id.clone();
    let prior = store.get_prior(&voting_id);
    if prior.is_some() {
        log::info!("re-voting in election {}, superseding the earlier ballot", voting_id);
    }

    let mut ballot = BallotSession::new(params, user, prior).unwrap_or_else(|e| {
        eprintln!("blindballot vote: {}", e);
        std::process::exit(1);
    });

    let client = HttpClient::new(uri, session);
    let response = ballot
        .run(&mut OsRng, Some(option), &client, &client)
        .unwrap_or_else(|e| {
            eprintln!("blindballot vote: {}", e);
            std::process::exit(1);
        });
    log::debug!("tally response: {}", response);

    // Keep the receipt for a later re-vote
    if let Some(receipt) = ballot.receipt() {
        println!("{}", bigint_to_base64(&receipt.label));
        store.set_prior(&voting_id, receipt);
        if let Err(e) = store.save() {
            log::warn!("unable to save receipt to {}: {}", receipts, e);
        }
    }
}
