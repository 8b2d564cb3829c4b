//! Property tests: `from_fragment(to_fragment(e)) == e` for valid entities.

use proptest::prelude::*;
use vc3_model::{
    AccessFlavor, AccessMethod, Allocation, Cluster, DocumentEntity, Environment, Nodeset, Project,
    Request, Resource, ResourceType, User,
};

fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9][a-z0-9._-]{0,30}").unwrap()
}

fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z][A-Za-z '-]{0,40}").unwrap()
}

fn email_strategy() -> impl Strategy<Value = String> {
    (
        prop::string::string_regex("[a-z0-9.]{1,12}").unwrap(),
        prop::string::string_regex("[a-z0-9]{1,12}\\.(org|edu|gov)").unwrap(),
    )
        .prop_map(|(local, domain)| format!("{local}@{domain}"))
}

fn roundtrip<E: DocumentEntity + std::fmt::Debug>(entity: &E) -> E {
    let (name, fragment) = entity.to_fragment().unwrap();
    E::from_fragment(name.as_str(), &fragment).unwrap()
}

proptest! {
    #[test]
    fn user_roundtrips(
        name in name_strategy(),
        first in text_strategy(),
        last in text_strategy(),
        email in email_strategy(),
        institution in text_strategy(),
    ) {
        let user = User::define(&name, first, last, email, institution).unwrap();
        prop_assert_eq!(roundtrip(&user), user);
    }

    #[test]
    fn project_roundtrips(
        name in name_strategy(),
        owner in name_strategy(),
        members in prop::collection::vec(name_strategy(), 0..8),
        allocations in prop::collection::vec(name_strategy(), 0..4),
    ) {
        let mut project = Project::define(&name, &owner, &members).unwrap();
        for a in &allocations {
            project.add_allocation(a.parse().unwrap());
        }
        prop_assert_eq!(roundtrip(&project), project);
    }

    #[test]
    fn resource_roundtrips(
        name in name_strategy(),
        owner in name_strategy(),
        rtype in prop::sample::select(ResourceType::ALL),
        method in prop::sample::select(AccessMethod::ALL),
        flavor in prop::sample::select(AccessFlavor::ALL),
        mfa in any::<bool>(),
        attrs in prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..5),
    ) {
        let mut resource = Resource::define(&name, &owner, rtype, method, flavor, "ce.example.org")
            .unwrap()
            .with_mfa(mfa);
        for (k, v) in attrs {
            resource = resource.with_attribute(k, v);
        }
        prop_assert_eq!(roundtrip(&resource), resource);
    }
}

#[test]
fn allocation_roundtrips_with_project() {
    let mut allocation = Allocation::define("alice", "bnl-sdcc", "quota")
        .unwrap()
        .with_attribute("hours", 1000);
    allocation.assign_to_project("p1".parse().unwrap()).unwrap();
    assert_eq!(roundtrip(&allocation), allocation);
}

#[test]
fn environment_roundtrips() {
    let env = Environment::define("py3", "alice")
        .unwrap()
        .with_package("python3")
        .unwrap()
        .with_var("LANG", "C")
        .unwrap();
    assert_eq!(roundtrip(&env), env);
}

#[test]
fn cluster_roundtrips() {
    let cluster = Cluster::define("c1", "alice")
        .unwrap()
        .with_nodeset(Nodeset::new("head", 1, "htcondor").unwrap())
        .unwrap()
        .with_nodeset(
            Nodeset::new("workers", 16, "htcondor")
                .unwrap()
                .with_environment("py3")
                .unwrap(),
        )
        .unwrap();
    assert_eq!(roundtrip(&cluster), cluster);
}

#[test]
fn request_roundtrips() {
    let request =
        Request::define("r1", "alice", "c1", "py3", ["alice.bnl", "alice.aws"], "weighted").unwrap();
    assert_eq!(roundtrip(&request), request);
}
