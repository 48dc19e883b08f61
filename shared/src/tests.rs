#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::net::{IpAddr, Ipv4Addr};
    use std::path::PathBuf;
    use uuid::Uuid;
    use crate::models::{PercentResponse, StoreData, Tally, VoteKind};
    use crate::store::VoteStore;
    use crate::voter::{fingerprint, generate_salt, join_forwarded, resolve_ip, ANONYMOUS_IP, SALT_LENGTH};

    const IP: &str = "1.2.3.4";

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("votes_test_{}.json", Uuid::new_v4()))
    }

    fn store() -> VoteStore {
        VoteStore::new(temp_path(), StoreData::default()).unwrap()
    }

    fn store_with(site: &str, tally: Tally) -> VoteStore {
        let mut data = StoreData::default();
        data.counts.insert(site.to_string(), tally);
        VoteStore::new(temp_path(), data).unwrap()
    }

    #[test]
    fn test_unknown_site_reads_zero_and_is_created() {
        let mut s = store();
        assert_eq!(s.tally("acme"), None);
        assert_eq!(s.percent("acme"), 0);
        assert_eq!(s.tally("acme"), Some(Tally(0, 0)));
    }

    #[test]
    fn test_single_votes() {
        let mut s = store();
        s.cast_vote("acme", IP, "1");
        assert_eq!(s.tally("acme"), Some(Tally(1, 0)));

        s.cast_vote("other", IP, "-1");
        assert_eq!(s.tally("other"), Some(Tally(0, 1)));
        assert_eq!(s.tally("acme"), Some(Tally(1, 0)));
    }

    #[test]
    fn test_repeat_vote_is_not_double_counted() {
        let mut s = store();
        s.cast_vote("acme", IP, "1");
        s.cast_vote("acme", IP, "1");
        assert_eq!(s.tally("acme"), Some(Tally(1, 0)));
    }

    #[test]
    fn test_changed_vote_moves_between_counters() {
        let mut s = store();
        s.cast_vote("acme", IP, "1");
        s.cast_vote("acme", "5.6.7.8", "1");
        s.cast_vote("acme", IP, "-1");
        assert_eq!(s.tally("acme"), Some(Tally(1, 1)));
        assert_eq!(s.latest_vote("acme", IP), Some("-1"));
    }

    #[test]
    fn test_rotation_allows_a_second_counted_vote() {
        let mut s = store();
        let salt = s.salt().to_string();
        s.cast_vote("acme", IP, "1");
        s.rotate().unwrap();

        assert_ne!(s.salt(), salt);
        assert!(s.data().latest.is_empty());
        assert_eq!(s.tally("acme"), Some(Tally(1, 0)));

        s.cast_vote("acme", IP, "1");
        assert_eq!(s.tally("acme"), Some(Tally(2, 0)));
    }

    #[test]
    fn test_unrecognised_vote_values_are_recorded_but_not_counted() {
        let mut s = store();
        s.cast_vote("acme", IP, "1");
        s.cast_vote("acme", IP, "0");
        assert_eq!(s.tally("acme"), Some(Tally(0, 0)));
        assert_eq!(s.latest_vote("acme", IP), Some("0"));

        // Nothing countable is on record any more, so a new up vote is simply added.
        s.cast_vote("acme", IP, "0");
        s.cast_vote("acme", IP, "1");
        assert_eq!(s.tally("acme"), Some(Tally(1, 0)));
    }

    #[test]
    fn test_percent_formula() {
        assert_eq!(store_with("a", Tally(3, 1)).percent("a"), 50);
        assert_eq!(store_with("a", Tally(1, 3)).percent("a"), -50);
        assert_eq!(store_with("a", Tally(0, 0)).percent("a"), 0);
        assert_eq!(store_with("a", Tally(1, 2)).percent("a"), -34);
        assert_eq!(store_with("a", Tally(2, 1)).percent("a"), 33);
        assert_eq!(Tally(64, 35).percent(), 29);
    }

    #[test]
    fn test_empty_and_odd_site_names_are_their_own_buckets() {
        let mut s = store();
        s.cast_vote("", IP, "1");
        s.cast_vote("a/b c", IP, "-1");
        assert_eq!(s.tally(""), Some(Tally(1, 0)));
        assert_eq!(s.tally("a/b c"), Some(Tally(0, 1)));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let path = temp_path();
        let mut s = VoteStore::new(&path, StoreData::default()).unwrap();
        s.cast_vote("acme", IP, "1");
        s.cast_vote("acme", "5.6.7.8", "-1");
        s.cast_vote("other", IP, "-1");
        s.save().unwrap();

        let loaded = VoteStore::load(&path).unwrap();
        assert_eq!(loaded.data(), s.data());
        assert_eq!(loaded.salt().len(), SALT_LENGTH);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_file_format() {
        let mut s = store();
        s.cast_vote("acme", IP, "1");
        let json: serde_json::Value = serde_json::to_value(s.data()).unwrap();
        let id = fingerprint(s.salt(), IP);

        assert_eq!(json["counts"]["acme"], serde_json::json!([1, 0]));
        assert_eq!(json["latest"]["acme"][id.as_str()], "1");
    }

    #[test]
    fn test_save_and_rotate_persists_an_empty_ledger() {
        let path = temp_path();
        let mut s = VoteStore::new(&path, StoreData::default()).unwrap();
        s.cast_vote("acme", IP, "1");
        s.save_and_rotate().unwrap();

        let loaded = VoteStore::load(&path).unwrap();
        assert_eq!(loaded.tally("acme"), Some(Tally(1, 0)));
        assert!(loaded.data().latest.is_empty());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_falls_back_to_empty() {
        let missing = VoteStore::load(temp_path()).unwrap();
        assert_eq!(missing.data(), &StoreData::default());

        let path = temp_path();
        std::fs::write(&path, "{not json").unwrap();
        let corrupt = VoteStore::load(&path).unwrap();
        assert_eq!(corrupt.data(), &StoreData::default());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_tolerates_missing_ledger() {
        let path = temp_path();
        std::fs::write(&path, r#"{"counts":{"acme":[4,1]}}"#).unwrap();
        let mut s = VoteStore::load(&path).unwrap();
        assert_eq!(s.percent("acme"), 60);
        assert!(s.data().latest.is_empty());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_salt_shape() {
        let salt = generate_salt().unwrap();
        assert_eq!(salt.len(), SALT_LENGTH);
        assert!(salt.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(salt, generate_salt().unwrap());
    }

    #[test]
    fn test_fingerprint_depends_on_salt_and_ip() {
        let id = fingerprint("salt", IP);
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id, fingerprint("salt", IP));
        assert_ne!(id, fingerprint("other", IP));
        assert_ne!(id, fingerprint("salt", "5.6.7.8"));
        // Plain concatenation, so the split point does not matter.
        assert_eq!(fingerprint("ab", "c"), fingerprint("a", "bc"));
    }

    #[test]
    fn test_resolve_ip() {
        let remote = Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(resolve_ip(Some("1.2.3.4, 5.6.7.8"), remote), "1.2.3.4, 5.6.7.8");
        assert_eq!(resolve_ip(None, remote), "10.0.0.1");
        assert_eq!(resolve_ip(Some(""), remote), "10.0.0.1");
        assert_eq!(resolve_ip(None, None), ANONYMOUS_IP);
    }

    #[test]
    fn test_anonymous_voters_share_one_fingerprint() {
        let mut s = store();
        let anonymous = resolve_ip(None, None);
        s.cast_vote("acme", &anonymous, "1");
        s.cast_vote("acme", &resolve_ip(None, None), "1");
        assert_eq!(s.tally("acme"), Some(Tally(1, 0)));
    }

    #[test]
    fn test_vote_classification() {
        assert_eq!(VoteKind::classify("1"), Some(VoteKind::Up));
        assert_eq!(VoteKind::classify("-1"), Some(VoteKind::Down));
        assert_eq!(VoteKind::classify("0"), None);
        assert_eq!(VoteKind::classify("+1"), None);
        assert_eq!(VoteKind::classify(""), None);
    }

    #[test]
    fn test_response_shape() {
        let ok = serde_json::to_value(PercentResponse::ok(-50)).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "percent": -50}));

        let failed = serde_json::to_value(PercentResponse::failure()).unwrap();
        assert_eq!(failed, serde_json::json!({"success": false}));

        let parsed: PercentResponse = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert_eq!(parsed, PercentResponse::failure());
    }

    #[test]
    fn test_negative_tallies_still_floor() {
        let mut counts = HashMap::new();
        counts.insert("a".to_string(), Tally(-1, 2));
        let mut s = VoteStore::new(temp_path(), StoreData { counts, latest: HashMap::new() }).unwrap();
        assert_eq!(s.percent("a"), -300);
    }

    #[test]
    fn test_huge_loaded_tallies_do_not_overflow() {
        let path = temp_path();
        std::fs::write(&path, r#"{"counts":{"acme":[100000000000000000,0],"max":[9223372036854775807,1]}}"#).unwrap();
        let mut s = VoteStore::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(s.percent("acme"), 100);
        assert_eq!(s.percent("max"), 99);
        assert_eq!(s.tally("max").unwrap().total(), i64::MAX);

        s.cast_vote("max", IP, "1");
        assert_eq!(s.tally("max"), Some(Tally(i64::MAX, 1)));
        s.cast_vote("max", IP, "-1");
        assert_eq!(s.tally("max"), Some(Tally(i64::MAX - 1, 2)));
        assert_eq!(s.percent("max"), 99);
    }

    #[test]
    fn test_percent_clamps_to_i64() {
        assert_eq!(Tally(i64::MAX, -(i64::MAX - 1)).percent(), i64::MAX);
        assert_eq!(Tally(-(i64::MAX - 1), i64::MAX).percent(), i64::MIN);
        assert_eq!(Tally(i64::MAX, i64::MIN + 1).percent(), 0);
    }

    #[test]
    fn test_repeated_forwarded_headers_are_joined() {
        assert_eq!(join_forwarded(Vec::new()), None);
        assert_eq!(join_forwarded(vec!["1.2.3.4"]), Some("1.2.3.4".to_string()));
        assert_eq!(
            join_forwarded(vec!["1.2.3.4", "5.6.7.8"]),
            Some("1.2.3.4, 5.6.7.8".to_string())
        );
    }
}
