use pretty_assertions::assert_eq;
use serde_json::json;
use vc3_model::{
    AccessFlavor, AccessMethod, Allocation, Cluster, DocumentEntity, EntityKind, Environment,
    Fragment, ModelError, Nodeset, Project, Request, Resource, ResourceType, User,
};

fn fragment(value: serde_json::Value) -> Fragment {
    value.as_object().cloned().expect("fragment must be an object")
}

fn alice() -> User {
    User::define("alice", "Alice", "A", "a@x.org", "Inst").unwrap()
}

// ── Kinds ────────────────────────────────────────────────────────

#[test]
fn every_kind_has_its_collection() {
    let collections: Vec<_> = EntityKind::ALL.iter().map(|k| k.collection()).collect();
    assert_eq!(
        collections,
        vec!["user", "project", "resource", "allocation", "cluster", "environment", "request"]
    );
    for kind in EntityKind::ALL {
        assert_eq!(EntityKind::from_collection(kind.collection()), Some(kind));
    }
    assert_eq!(EntityKind::from_collection("blueprint"), None);
}

// ── User ─────────────────────────────────────────────────────────

#[test]
fn user_define_keeps_fields() {
    let u = alice();
    assert_eq!(u.name(), "alice");
    assert_eq!(u.first(), "Alice");
    assert_eq!(u.last(), "A");
    assert_eq!(u.email(), "a@x.org");
    assert_eq!(u.institution(), "Inst");
}

#[test]
fn user_define_rejects_bad_fields() {
    assert!(matches!(
        User::define("alice", "", "A", "a@x.org", "Inst"),
        Err(ModelError::Validation(_))
    ));
    assert!(User::define("alice", "Alice", "A", "not-an-email", "Inst").is_err());
    assert!(User::define("al/ice", "Alice", "A", "a@x.org", "Inst").is_err());
}

#[test]
fn user_fragment_uses_wire_names_without_name() {
    let (name, frag) = alice().to_fragment().unwrap();
    assert_eq!(name, "alice");
    assert_eq!(
        serde_json::Value::Object(frag),
        json!({"first": "Alice", "last": "A", "email": "a@x.org", "institution": "Inst"})
    );
}

#[test]
fn user_from_fragment_ignores_unknown_fields() {
    let frag = fragment(json!({
        "first": "Alice", "last": "A", "email": "a@x.org", "institution": "Inst",
        "acl": ["admin"], "state": "new"
    }));
    let u = User::from_fragment("alice", &frag).unwrap();
    assert_eq!(u, alice());
}

#[test]
fn user_from_fragment_key_overrides_embedded_name() {
    let frag = fragment(json!({
        "name": "mallory", "first": "Alice", "last": "A", "email": "a@x.org", "institution": "Inst"
    }));
    let u = User::from_fragment("alice", &frag).unwrap();
    assert_eq!(u.name(), "alice");
}

#[test]
fn user_from_fragment_missing_field_is_deserialization_error() {
    let frag = fragment(json!({"first": "Alice", "last": "A"}));
    match User::from_fragment("alice", &frag) {
        Err(ModelError::Deserialization { kind, name, .. }) => {
            assert_eq!(kind, EntityKind::User);
            assert_eq!(name, "alice");
        }
        other => panic!("expected deserialization error, got {other:?}"),
    }
}

#[test]
fn from_value_rejects_non_object() {
    let err = User::from_value("alice", &json!("just a string")).unwrap_err();
    assert!(matches!(err, ModelError::Deserialization { .. }));
}

#[test]
fn from_fragment_rejects_invalid_key() {
    let (_, frag) = alice().to_fragment().unwrap();
    assert!(matches!(
        User::from_fragment("bad name", &frag),
        Err(ModelError::Deserialization { .. })
    ));
}

// ── Project ──────────────────────────────────────────────────────

#[test]
fn project_members_are_a_set() {
    let mut p = Project::define("p1", "alice", ["bob", "carol", "bob"]).unwrap();
    assert_eq!(p.members(), ["bob", "carol"]);

    assert!(!p.add_member("bob".parse().unwrap()));
    assert!(p.add_member("dave".parse().unwrap()));
    assert_eq!(p.members(), ["bob", "carol", "dave"]);
    assert!(p.has_member("dave"));
}

#[test]
fn project_define_with_no_members() {
    let p = Project::define("p1", "alice", Vec::<String>::new()).unwrap();
    assert_eq!(p.owner(), "alice");
    assert!(p.members().is_empty());
    assert!(p.allocations().is_empty());
}

#[test]
fn project_fragment_defaults_missing_lists() {
    let p = Project::from_fragment("p1", &fragment(json!({"owner": "alice"}))).unwrap();
    assert!(p.members().is_empty());
    assert!(p.allocations().is_empty());
}

#[test]
fn project_fragment_collapses_legacy_duplicates() {
    let p = Project::from_fragment(
        "p1",
        &fragment(json!({"owner": "alice", "members": ["bob", "bob", "carol"]})),
    )
    .unwrap();
    assert_eq!(p.members(), ["bob", "carol"]);
}

#[test]
fn project_fragment_without_owner_fails() {
    let result = Project::from_fragment("p1", &fragment(json!({"members": []})));
    assert!(matches!(result, Err(ModelError::Deserialization { .. })));
}

// ── Resource ─────────────────────────────────────────────────────

#[test]
fn resource_fragment_wire_format() {
    let r = Resource::define(
        "bnl-sdcc",
        "alice",
        ResourceType::RemoteBatch,
        AccessMethod::Ssh,
        AccessFlavor::HtcondorCe,
        "gridgk01.racf.bnl.gov",
    )
    .unwrap()
    .with_mfa(true)
    .with_attribute("queue", "short");

    let (_, frag) = r.to_fragment().unwrap();
    assert_eq!(
        serde_json::Value::Object(frag.clone()),
        json!({
            "owner": "alice",
            "resourcetype": "remote-batch",
            "accessmethod": "ssh",
            "accessflavor": "htcondor-ce",
            "gridresource": "gridgk01.racf.bnl.gov",
            "mfa": true,
            "attributemap": {"queue": "short"}
        })
    );
    assert_eq!(Resource::from_fragment("bnl-sdcc", &frag).unwrap(), r);
}

#[test]
fn resource_unknown_flavor_fails_to_load() {
    let frag = fragment(json!({
        "owner": "alice", "resourcetype": "cloud", "accessmethod": "ssh",
        "accessflavor": "openstack", "gridresource": "https://cloud.example"
    }));
    assert!(Resource::from_fragment("c1", &frag).is_err());
}

#[test]
fn resource_requires_endpoint() {
    let result = Resource::define(
        "r1",
        "alice",
        ResourceType::Cloud,
        AccessMethod::Ssh,
        AccessFlavor::Ec2,
        " ",
    );
    assert!(result.is_err());
}

#[test]
fn resource_null_attribute_is_invalid() {
    let r = Resource::define(
        "r1",
        "alice",
        ResourceType::Cloud,
        AccessMethod::Ssh,
        AccessFlavor::Ec2,
        "ec2.amazonaws.com",
    )
    .unwrap()
    .with_attribute("quota", serde_json::Value::Null);
    assert!(matches!(r.to_fragment(), Err(ModelError::Validation(_))));

    let nested = r
        .clone()
        .with_attribute("quota", json!({"soft": 10, "hard": null}));
    assert!(matches!(nested.validate(), Err(ModelError::Validation(_))));
}

// ── Allocation ───────────────────────────────────────────────────

#[test]
fn allocation_default_name_joins_user_and_resource() {
    let a = Allocation::define("alice", "bnl-sdcc", "unlimited").unwrap();
    assert_eq!(a.name(), "alice.bnl-sdcc");
    assert_eq!(a.user(), "alice");
    assert_eq!(a.resource(), "bnl-sdcc");
    assert_eq!(a.project(), None);
}

#[test]
fn allocation_default_name_too_long_points_to_define_named() {
    let user = "u".repeat(70);
    let resource = "r".repeat(70);
    let err = Allocation::define(&user, &resource, "unlimited").unwrap_err();
    assert!(err.to_string().contains("define_named"), "{err}");

    let a = Allocation::define_named("u.r", &user, &resource, "unlimited").unwrap();
    assert_eq!(a.user().as_str(), user);
}

#[test]
fn allocation_null_attribute_is_invalid() {
    let a = Allocation::define("alice", "bnl-sdcc", "unlimited")
        .unwrap()
        .with_attribute("cores", serde_json::Value::Null);
    assert!(matches!(a.to_fragment(), Err(ModelError::Validation(_))));
}

#[test]
fn allocation_belongs_to_at_most_one_project() {
    let mut a = Allocation::define("alice", "bnl-sdcc", "unlimited").unwrap();
    assert!(a.assign_to_project("p1".parse().unwrap()).unwrap());
    assert!(!a.assign_to_project("p1".parse().unwrap()).unwrap());
    assert!(a.assign_to_project("p2".parse().unwrap()).is_err());
    assert_eq!(a.project().map(|p| p.as_str()), Some("p1"));
}

#[test]
fn allocation_fragment_omits_unset_project() {
    let a = Allocation::define("alice", "bnl-sdcc", "unlimited")
        .unwrap()
        .with_attribute("cores", 64);
    let (_, frag) = a.to_fragment().unwrap();
    assert!(!frag.contains_key("project"));
    assert_eq!(frag["allocationtype"], "unlimited");
    assert_eq!(frag["attributemap"]["cores"], 64);
}

// ── Environment, Cluster, Request ────────────────────────────────

#[test]
fn environment_collects_packages_and_vars() {
    let env = Environment::define("py3", "alice")
        .unwrap()
        .with_package("python3")
        .unwrap()
        .with_package("python3")
        .unwrap()
        .with_var("PYTHONPATH", "/opt/lib")
        .unwrap();
    assert_eq!(env.packages(), ["python3"]);
    assert_eq!(env.envmap()["PYTHONPATH"], "/opt/lib");
    assert!(Environment::define("e", "alice").unwrap().with_var("A=B", "x").is_err());
}

#[test]
fn cluster_rejects_duplicate_nodesets_and_empty_sets() {
    assert!(Nodeset::new("workers", 0, "htcondor").is_err());

    let workers = Nodeset::new("workers", 4, "htcondor")
        .unwrap()
        .with_environment("py3")
        .unwrap();
    let cluster = Cluster::define("c1", "alice")
        .unwrap()
        .with_nodeset(workers.clone())
        .unwrap();
    assert_eq!(cluster.node_count(), 4);
    assert_eq!(cluster.environments(), vec![workers.environment().unwrap()]);
    assert!(cluster.with_nodeset(workers).is_err());
}

#[test]
fn cluster_fragment_with_duplicate_nodesets_fails_to_load() {
    let frag = fragment(json!({
        "owner": "alice",
        "nodesets": [
            {"name": "w", "node_number": 1, "app_type": "htcondor"},
            {"name": "w", "node_number": 2, "app_type": "htcondor"}
        ]
    }));
    assert!(Cluster::from_fragment("c1", &frag).is_err());
}

#[test]
fn request_needs_allocations_and_policy() {
    assert!(Request::define("r1", "alice", "c1", "py3", Vec::<&str>::new(), "static").is_err());
    assert!(Request::define("r1", "alice", "c1", "py3", ["alice.bnl"], "").is_err());

    let r = Request::define("r1", "alice", "c1", "py3", ["alice.bnl", "alice.bnl"], "static")
        .unwrap();
    assert_eq!(r.allocations(), ["alice.bnl"]);
    assert_eq!(r.cluster(), "c1");
    assert_eq!(r.environment(), "py3");
    assert_eq!(r.policy(), "static");
}
