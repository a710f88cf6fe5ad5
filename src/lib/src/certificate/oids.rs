//! Object identifiers of certificate extensions used by code signing.
//!
//! The Apple marker extensions are not part of RFC 5280, so most certificate
//! libraries only expose them as unrecognized extensions.

use super::Oid;
use crate::error::*;

pub const BASIC_CONSTRAINTS: Oid = Oid::new_unwrap("2.5.29.19");
pub const KEY_USAGE: Oid = Oid::new_unwrap("2.5.29.15");
pub const EXT_KEY_USAGE: Oid = Oid::new_unwrap("2.5.29.37");
pub const SUBJECT_KEY_IDENTIFIER: Oid = Oid::new_unwrap("2.5.29.14");
pub const AUTHORITY_KEY_IDENTIFIER: Oid = Oid::new_unwrap("2.5.29.35");
pub const SUBJECT_ALT_NAME: Oid = Oid::new_unwrap("2.5.29.17");
pub const ISSUER_ALT_NAME: Oid = Oid::new_unwrap("2.5.29.18");
pub const CERTIFICATE_POLICIES: Oid = Oid::new_unwrap("2.5.29.32");
pub const CRL_DISTRIBUTION_POINTS: Oid = Oid::new_unwrap("2.5.29.31");
pub const NAME_CONSTRAINTS: Oid = Oid::new_unwrap("2.5.29.30");
pub const POLICY_CONSTRAINTS: Oid = Oid::new_unwrap("2.5.29.36");
pub const AUTHORITY_INFO_ACCESS: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.1.1");

pub const APPLE_IPHONE_DEVELOPER: Oid = Oid::new_unwrap("1.2.840.113635.100.6.1.2");
pub const APPLE_IPHONE_DISTRIBUTION: Oid = Oid::new_unwrap("1.2.840.113635.100.6.1.4");
pub const APPLE_MAC_APP_STORE: Oid = Oid::new_unwrap("1.2.840.113635.100.6.1.9");
pub const APPLE_MAC_DEVELOPER: Oid = Oid::new_unwrap("1.2.840.113635.100.6.1.12");
pub const APPLE_DEVELOPER_ID_APPLICATION: Oid = Oid::new_unwrap("1.2.840.113635.100.6.1.13");
pub const APPLE_DEVELOPER_ID_INSTALLER: Oid = Oid::new_unwrap("1.2.840.113635.100.6.1.14");
pub const APPLE_WWDR_INTERMEDIATE: Oid = Oid::new_unwrap("1.2.840.113635.100.6.2.1");
pub const APPLE_DEVELOPER_ID_CA: Oid = Oid::new_unwrap("1.2.840.113635.100.6.2.6");

const NAMED: &[(&str, Oid)] = &[
    ("basic-constraints", BASIC_CONSTRAINTS),
    ("key-usage", KEY_USAGE),
    ("ext-key-usage", EXT_KEY_USAGE),
    ("subject-key-identifier", SUBJECT_KEY_IDENTIFIER),
    ("authority-key-identifier", AUTHORITY_KEY_IDENTIFIER),
    ("subject-alt-name", SUBJECT_ALT_NAME),
    ("issuer-alt-name", ISSUER_ALT_NAME),
    ("certificate-policies", CERTIFICATE_POLICIES),
    ("crl-distribution-points", CRL_DISTRIBUTION_POINTS),
    ("name-constraints", NAME_CONSTRAINTS),
    ("policy-constraints", POLICY_CONSTRAINTS),
    ("authority-info-access", AUTHORITY_INFO_ACCESS),
    ("iphone-developer", APPLE_IPHONE_DEVELOPER),
    ("iphone-distribution", APPLE_IPHONE_DISTRIBUTION),
    ("mac-app-store", APPLE_MAC_APP_STORE),
    ("mac-developer", APPLE_MAC_DEVELOPER),
    ("developer-id-application", APPLE_DEVELOPER_ID_APPLICATION),
    ("developer-id-installer", APPLE_DEVELOPER_ID_INSTALLER),
    ("wwdr-intermediate", APPLE_WWDR_INTERMEDIATE),
    ("developer-id-ca", APPLE_DEVELOPER_ID_CA),
];

/// Look up an extension OID by its short name.
pub fn by_name(name: &str) -> Option<Oid> {
    NAMED
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|(_, oid)| *oid)
}

/// Parse either a short name or a dotted decimal OID.
pub fn parse(s: &str) -> Result<Oid, CSError> {
    if let Some(oid) = by_name(s) {
        return Ok(oid);
    }
    Oid::new(s).map_err(|_| CSError::InvalidArgument)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_dotted_forms() {
        assert_eq!(
            parse("developer-id-application").unwrap(),
            APPLE_DEVELOPER_ID_APPLICATION
        );
        assert_eq!(parse("Key-Usage").unwrap(), KEY_USAGE);
        assert_eq!(parse("2.5.29.37").unwrap(), EXT_KEY_USAGE);
        assert!(matches!(parse("not an oid"), Err(CSError::InvalidArgument)));
    }
}
