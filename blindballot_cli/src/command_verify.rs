use blindballot::CorrectMessageProof;

pub fn command_verify(matches: &clap::ArgMatches) {
    // Unwraps are OK, both these args are required
    let params = crate::read_params(matches.value_of("params").unwrap());
    let filename = crate::expand(matches.value_of("PROOF").unwrap());

    let json = std::fs::read_to_string(&filename).unwrap_or_else(|e| {
        eprintln!("blindballot verify-proof: unable to read {}: {}", &filename, e);
        std::process::exit(1);
    });
    let proof: CorrectMessageProof = serde_json::from_str(&json).unwrap_or_else(|e| {
        eprintln!("blindballot verify-proof: unable to read {}: {}", &filename, e);
        std::process::exit(1);
    });

    // When the ballot size is known, the proof must be over this ballot's variants
    if params.options_amount != 0 {
        let variants = params.vote_variants().unwrap_or_else(|e| {
            eprintln!("blindballot verify-proof: {}", e);
            std::process::exit(1);
        });
        if proof.valid_messages.as_slice() != variants.as_slice() {
            eprintln!("blindballot verify-proof: proof is not over this ballot's vote variants");
            std::process::exit(1);
        }
    }

    match proof.verify(&params.paillier, params.challenge_bits) {
        Ok(()) => println!("valid"),
        Err(e) => {
            eprintln!("blindballot verify-proof: {}", e);
            std::process::exit(1);
        }
    }
}
