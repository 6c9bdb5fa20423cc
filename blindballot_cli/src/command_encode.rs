use blindballot::{bigint_to_base64, bigint_to_base64_bytes, parse_decimal};

pub fn command_encode(matches: &clap::ArgMatches) {
    // Unwrap is OK, the arg is required
    let input = matches.value_of("INTEGER").unwrap().trim();

    let value = parse_decimal(input.as_bytes()).unwrap_or_else(|e| {
        eprintln!("blindballot encode: {}", e);
        std::process::exit(1);
    });

    println!("decimal:         {}", value);
    println!("base64(decimal): {}", bigint_to_base64(&value));
    println!("base64(bytes):   {}", bigint_to_base64_bytes(&value));
}
