//! Configuration file round trip: read a hand-written file, change values,
//! and rewrite it without losing the operator's comments.

use std::fs;

use fwd_conf::{ChainPolicy, DaemonConf, ReloadPolicy};
use tempfile::tempdir;

#[test]
fn read_modify_write_cycle_preserves_the_operators_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fwd.conf");
    fs::write(
        &path,
        "# fwd configuration\n\
         # default zone applied to unassigned interfaces\n\
         DefaultZone=home\n\
         LogDenied=Unicast\n\
         ReloadPolicy=accept\n",
    )
    .unwrap();

    let mut conf = DaemonConf::new(&path);
    conf.read().unwrap();

    // Values arrive canonicalized
    assert_eq!(conf.get("DefaultZone"), Some("home"));
    assert_eq!(conf.get("LogDenied"), Some("unicast"));
    let policy: ReloadPolicy = conf.get("ReloadPolicy").unwrap().parse().unwrap();
    assert_eq!(policy, ReloadPolicy::uniform(ChainPolicy::Accept));

    conf.set("DefaultZone", "public");
    conf.write().unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("# default zone applied to unassigned interfaces\n"));
    assert!(text.contains("DefaultZone=public\n"));
    assert!(!text.contains("DefaultZone=home"));

    // The pre-rewrite content survives as a backup
    let backup = fs::read_to_string(dir.path().join("fwd.conf.old")).unwrap();
    assert!(backup.contains("DefaultZone=home"));

    // Reading what we wrote converges: another write is a no-op
    fs::remove_file(dir.path().join("fwd.conf.old")).unwrap();
    let mut again = DaemonConf::new(&path);
    again.read().unwrap();
    again.write().unwrap();
    assert!(!dir.path().join("fwd.conf.old").exists());
}
