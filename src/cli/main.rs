use csutils::{
    certificate_has_field, digest_to_hex, hash_file_desc, hash_of_certificate_ref, oids,
    CSError, CopyFlags, Copyfile, FileDesc, HashAccumulator, Sha1, Sha256, X509Certificate,
};

#[macro_use]
extern crate clap;

use clap::Arg;

fn file_hash<H: HashAccumulator>(
    input_file: &str,
    mut hasher: H,
    limit: usize,
) -> Result<(usize, String), CSError> {
    let mut file = FileDesc::open(input_file)?;
    let total = hash_file_desc(&mut file, &mut hasher, limit)?;
    Ok((total, digest_to_hex(hasher.finalize())?))
}

fn start() -> Result<(), CSError> {
    let matches = command!()
        .arg(
            Arg::new("in")
                .value_name("input_file")
                .long("input-file")
                .short('i')
                .takes_value(true)
                .help("Input file"),
        )
        .arg(
            Arg::new("out")
                .value_name("output_file")
                .long("output-file")
                .short('o')
                .takes_value(true)
                .help("Output file"),
        )
        .arg(
            Arg::new("certificate")
                .value_name("certificate_file")
                .long("certificate")
                .short('c')
                .takes_value(true)
                .help("Certificate file (DER or PEM)"),
        )
        .arg(
            Arg::new("oid")
                .value_name("oid")
                .long("oid")
                .short('O')
                .takes_value(true)
                .help("Extension OID, dotted or by name (e.g. developer-id-application)"),
        )
        .arg(
            Arg::new("limit")
                .value_name("bytes")
                .long("limit")
                .short('l')
                .takes_value(true)
                .help("Hash at most this many bytes (0 = whole file)"),
        )
        .arg(
            Arg::new("sha256")
                .long("sha256")
                .help("Use SHA-256 instead of SHA-1 for file hashes"),
        )
        .arg(
            Arg::new("flags")
                .value_name("flags")
                .long("flags")
                .short('f')
                .takes_value(true)
                .help("Copy flags, comma-separated (e.g. data,stat,excl)"),
        )
        .arg(
            Arg::new("action")
                .long("action")
                .short('a')
                .value_name("action (cert-hash, file-hash, has-field, copy)")
                .takes_value(true)
                .required(true)
                .help("Action"),
        )
        .arg(Arg::new("verbose").short('v').help("Verbose output"))
        .arg(Arg::new("debug").short('d').help("Debug information"))
        .get_matches();

    let input_file = matches.value_of("in");
    let output_file = matches.value_of("out");
    let certificate_file = matches.value_of("certificate");
    let action = matches
        .value_of("action")
        .ok_or(CSError::UsageError("Action required"))?;
    let verbose = matches.is_present("verbose");
    let debug = matches.is_present("debug");

    env_logger::builder()
        .format_timestamp(None)
        .format_level(false)
        .format_module_path(false)
        .format_target(false)
        .filter_level(if debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    match action {
        "cert-hash" => {
            let certificate_file =
                certificate_file.ok_or(CSError::UsageError("Missing certificate file"))?;
            let cert = X509Certificate::from_file(certificate_file)?;
            let digest = hash_of_certificate_ref(&cert)?;
            println!("{}", digest_to_hex(digest)?);
        }
        "file-hash" => {
            let input_file = input_file.ok_or(CSError::UsageError("Missing input file"))?;
            let limit = match matches.value_of("limit") {
                None => 0,
                Some(limit) => limit.parse().map_err(|_| CSError::InvalidArgument)?,
            };
            let (total, digest) = if matches.is_present("sha256") {
                file_hash(input_file, Sha256::new(), limit)?
            } else {
                file_hash(input_file, Sha1::new(), limit)?
            };
            if verbose {
                println!("{} bytes read", total);
            }
            println!("{}", digest);
        }
        "has-field" => {
            let certificate_file =
                certificate_file.ok_or(CSError::UsageError("Missing certificate file"))?;
            let oid = oids::parse(
                matches
                    .value_of("oid")
                    .ok_or(CSError::UsageError("Missing OID"))?,
            )?;
            let cert = X509Certificate::from_file(certificate_file)?;
            if certificate_has_field(&cert, &oid)? {
                println!("Field {} is present.", oid);
            } else {
                println!("Field {} is not present.", oid);
                std::process::exit(2);
            }
        }
        "copy" => {
            let input_file = input_file.ok_or(CSError::UsageError("Missing input file"))?;
            let output_file = output_file.ok_or(CSError::UsageError("Missing output file"))?;
            let flags = match matches.value_of("flags") {
                None => CopyFlags::ALL,
                Some(flags) => CopyFlags::parse_list(flags)?,
            };
            let mut copier = Copyfile::new()?;
            copier.copy(input_file, output_file, flags)?;
            if verbose {
                if let Some(state) = copier.state() {
                    println!("{} bytes copied", state.copied());
                }
            }
        }
        _ => {
            return Err(CSError::UsageError("Unknown action"));
        }
    }
    Ok(())
}

fn main() -> Result<(), CSError> {
    let res = start();
    match res {
        Ok(_) => {}
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}
