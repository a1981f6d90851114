use std::time::Duration;

use k8s_openapi::api::core::v1 as core;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use simplekube::resources::ConfigMap;
use simplekube::{Client, Context, Error};
use simplekube_fake::FakeCluster;

fn cluster() -> FakeCluster {
    FakeCluster::new()
        .with(core::ConfigMap {
            metadata: ObjectMeta { name: Some("cfg".into()), namespace: Some("default".into()), ..Default::default() },
            ..Default::default()
        })
        .unwrap()
}

#[tokio::test]
async fn cancelled_context_is_not_reported_as_not_found() {
    let cluster = cluster();
    let ctx = Context::background().with_cancel();
    let client = Client::new(ctx.clone(), cluster.clone());
    let q = client.namespaced_query("default");
    ctx.cancel();

    let err = q.config_map().get("cfg").run().await.unwrap_err();
    assert!(matches!(err, Error::Cancelled));
    assert!(!err.is_not_found());

    let err = q.config_map().create(ConfigMap { name: "x".into(), ..Default::default() }).run().await.unwrap_err();
    assert!(matches!(err, Error::Cancelled));
    assert!(cluster.actions().is_empty());
}

#[tokio::test]
async fn expired_deadline_fails_every_verb() {
    let cluster = cluster();
    let ctx = Context::background().with_timeout(Duration::ZERO);
    let client = Client::new(ctx, cluster.clone());
    let q = client.namespaced_query("default");

    assert!(matches!(q.config_map().get("cfg").run().await, Err(Error::DeadlineExceeded)));
    assert!(matches!(q.config_map().list().run().await, Err(Error::DeadlineExceeded)));
    assert!(matches!(q.config_map().delete("cfg").run().await, Err(Error::DeadlineExceeded)));
    assert!(cluster.actions().is_empty());
}

#[tokio::test]
async fn cancelling_a_child_leaves_the_parent_usable() {
    let cluster = cluster();
    let parent = Context::background();
    let child = parent.with_cancel();
    child.cancel();

    let cancelled = Client::new(child, cluster.clone());
    assert!(cancelled.cluster_query().namespace().list().run().await.is_err());

    let live = Client::new(parent, cluster);
    let cm = live.namespaced_query("default").config_map().get("cfg").run().await.unwrap();
    assert_eq!(cm.name, "cfg");
}
