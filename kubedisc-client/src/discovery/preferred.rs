//! Reducing discovery listings to one entry per resource
//!
//! A resource is often served at several versions of its group (`apps/v1beta2` and `apps/v1`).
//! [`server_preferred_resources`] keeps each `(group, resource)` once, under the version its
//! group prefers, falling back to the first version that served it.
use std::{collections::HashMap, sync::Arc};

use kubedisc_core::{
    discovery::{is_subresource, APIResource, APIResourceList},
    GroupResource, GroupVersion,
};

use super::Discover;
use crate::Result;

/// Lists the resources of every version of every group, in the order the server declares them
///
/// The first failing fetch aborts the whole listing.
pub async fn server_resources<D: Discover + ?Sized>(disco: &D) -> Result<Vec<Arc<APIResourceList>>> {
    let groups = disco.server_groups().await?;
    let mut lists = Vec::new();
    for group in &groups.groups {
        for version in &group.versions {
            lists.push(disco.server_resources_for_group_version(&version.group_version).await?);
        }
    }
    Ok(lists)
}

/// Lists every resource once, under the group version that serves it best
///
/// Every group version the server declares gets a list in the output, in declaration order,
/// even when all of its resources were claimed by a preferred version elsewhere.
/// Within a group, a resource is assigned to the first version serving it, unless the group's
/// preferred version also serves it. Subresources (`pods/status`) are left out.
///
/// The first failing fetch aborts the whole listing.
pub async fn server_preferred_resources<D: Discover + ?Sized>(disco: &D) -> Result<Vec<APIResourceList>> {
    let groups = disco.server_groups().await?;

    let mut lists: Vec<APIResourceList> = Vec::new();
    let mut list_index: HashMap<GroupVersion, usize> = HashMap::new();
    // winners in the order they were first recorded, and where to find them
    let mut chosen: Vec<(GroupVersion, APIResource)> = Vec::new();
    let mut chosen_index: HashMap<GroupResource, usize> = HashMap::new();

    for group in &groups.groups {
        let preferred = group.preferred_version.as_ref().map(|p| p.version.as_str());
        for version in &group.versions {
            let resources = disco.server_resources_for_group_version(&version.group_version).await?;
            let gv = GroupVersion::gv(&group.name, &version.version);

            // a version listed twice in one group shares the first list
            list_index.entry(gv.clone()).or_insert_with(|| {
                lists.push(APIResourceList {
                    group_version: version.group_version.clone(),
                    resources: vec![],
                });
                lists.len() - 1
            });

            for ar in resources.resources.iter().filter(|ar| !is_subresource(&ar.name)) {
                let gr = GroupResource::gr(&group.name, &ar.name);
                match chosen_index.get(&gr) {
                    // only the preferred version may take over
                    Some(&idx) if preferred == Some(version.version.as_str()) => {
                        chosen[idx] = (gv.clone(), ar.clone());
                    }
                    Some(_) => {}
                    None => {
                        chosen_index.insert(gr, chosen.len());
                        chosen.push((gv.clone(), ar.clone()));
                    }
                }
            }
        }
    }

    for (gv, ar) in chosen {
        if let Some(&idx) = list_index.get(&gv) {
            lists[idx].resources.push(ar);
        }
    }
    Ok(lists)
}

/// Like [`server_preferred_resources`], keeping only namespaced resources
pub async fn server_preferred_namespaced_resources<D: Discover + ?Sized>(
    disco: &D,
) -> Result<Vec<APIResourceList>> {
    let all = server_preferred_resources(disco).await?;
    Ok(filtered_by(|_, ar| ar.namespaced, all))
}

/// Keep the resources for which `keep(group_version, resource)` holds
///
/// Lists that end up empty are kept, so the group versions in the output stay the same.
pub fn filtered_by<P>(keep: P, lists: Vec<APIResourceList>) -> Vec<APIResourceList>
where
    P: Fn(&str, &APIResource) -> bool,
{
    lists
        .into_iter()
        .map(|mut list| {
            let gv = std::mem::take(&mut list.group_version);
            list.resources.retain(|ar| keep(&gv, ar));
            list.group_version = gv;
            list
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::test_utils::{count, resource, FakeDiscovery};

    fn names(list: &APIResourceList) -> Vec<&str> {
        list.resources.iter().map(|r| r.name.as_str()).collect()
    }

    fn group_versions(lists: &[APIResourceList]) -> Vec<&str> {
        lists.iter().map(|l| l.group_version.as_str()).collect()
    }

    #[tokio::test]
    async fn preferred_version_wins() {
        let disco = FakeDiscovery::new()
            .group("apps", &["v1beta1", "v1"], Some("v1"))
            .resources("apps/v1beta1", vec![resource("deployments", "Deployment", true)])
            .resources("apps/v1", vec![resource("deployments", "Deployment", true)]);

        let lists = server_preferred_resources(&disco).await.unwrap();
        assert_eq!(group_versions(&lists), vec!["apps/v1beta1", "apps/v1"]);
        assert!(lists[0].resources.is_empty());
        assert_eq!(names(&lists[1]), vec!["deployments"]);
    }

    #[tokio::test]
    async fn first_version_wins_over_non_preferred() {
        let disco = FakeDiscovery::new()
            .group("autoscaling", &["v2", "v1", "v2beta2"], Some("v1"))
            .resources("autoscaling/v2", vec![
                resource("horizontalpodautoscalers", "HorizontalPodAutoscaler", true),
                resource("scalers", "Scaler", true),
            ])
            .resources("autoscaling/v1", vec![resource(
                "horizontalpodautoscalers",
                "HorizontalPodAutoscaler",
                true,
            )])
            .resources("autoscaling/v2beta2", vec![
                resource("horizontalpodautoscalers", "HorizontalPodAutoscaler", true),
                resource("scalers", "Scaler", true),
            ]);

        let lists = server_preferred_resources(&disco).await.unwrap();
        assert_eq!(names(&lists[0]), vec!["scalers"]);
        assert_eq!(names(&lists[1]), vec!["horizontalpodautoscalers"]);
        assert!(lists[2].resources.is_empty());
    }

    #[tokio::test]
    async fn without_preferred_version_first_seen_wins() {
        let disco = FakeDiscovery::new()
            .group("example.io", &["v1alpha1", "v1"], None)
            .resources("example.io/v1alpha1", vec![resource("widgets", "Widget", false)])
            .resources("example.io/v1", vec![resource("widgets", "Widget", false)]);

        let lists = server_preferred_resources(&disco).await.unwrap();
        assert_eq!(names(&lists[0]), vec!["widgets"]);
        assert!(lists[1].resources.is_empty());
    }

    #[tokio::test]
    async fn single_version_group() {
        let disco = FakeDiscovery::new()
            .group("batch", &["v1"], Some("v1"))
            .resources("batch/v1", vec![resource("jobs", "Job", true)]);

        let lists = server_preferred_resources(&disco).await.unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].group_version, "batch/v1");
        assert_eq!(names(&lists[0]), vec!["jobs"]);
    }

    #[tokio::test]
    async fn subresources_are_skipped() {
        let disco = FakeDiscovery::new()
            .group("", &["v1"], Some("v1"))
            .resources("v1", vec![
                resource("pods", "Pod", true),
                resource("pods/status", "Pod", true),
                resource("pods/log", "Pod", true),
            ]);

        let lists = server_preferred_resources(&disco).await.unwrap();
        assert_eq!(names(&lists[0]), vec!["pods"]);
    }

    #[tokio::test]
    async fn same_resource_name_in_different_groups() {
        let disco = FakeDiscovery::new()
            .group("", &["v1"], Some("v1"))
            .group("events.k8s.io", &["v1"], Some("v1"))
            .resources("v1", vec![resource("events", "Event", true)])
            .resources("events.k8s.io/v1", vec![resource("events", "Event", true)]);

        let lists = server_preferred_resources(&disco).await.unwrap();
        assert_eq!(group_versions(&lists), vec!["v1", "events.k8s.io/v1"]);
        assert_eq!(names(&lists[0]), vec!["events"]);
        assert_eq!(names(&lists[1]), vec!["events"]);
    }

    #[tokio::test]
    async fn repeated_version_shares_one_list() {
        let disco = FakeDiscovery::new()
            .group("apps", &["v1", "v1"], Some("v1"))
            .resources("apps/v1", vec![resource("deployments", "Deployment", true)]);

        let lists = server_preferred_resources(&disco).await.unwrap();
        assert_eq!(group_versions(&lists), vec!["apps/v1"]);
        assert_eq!(names(&lists[0]), vec!["deployments"]);
    }

    #[tokio::test]
    async fn groups_without_versions_contribute_nothing() {
        let disco = FakeDiscovery::new()
            .group("empty.io", &[], None)
            .group("batch", &["v1"], Some("v1"))
            .resources("batch/v1", vec![resource("jobs", "Job", true)]);

        let lists = server_preferred_resources(&disco).await.unwrap();
        assert_eq!(group_versions(&lists), vec!["batch/v1"]);
    }

    #[tokio::test]
    async fn resources_keep_their_listing_order() {
        let disco = FakeDiscovery::new()
            .group("", &["v1"], Some("v1"))
            .resources("v1", vec![
                resource("pods", "Pod", true),
                resource("namespaces", "Namespace", false),
                resource("configmaps", "ConfigMap", true),
            ]);

        let lists = server_preferred_resources(&disco).await.unwrap();
        assert_eq!(names(&lists[0]), vec!["pods", "namespaces", "configmaps"]);
    }

    #[tokio::test]
    async fn fetch_error_aborts() {
        let disco = FakeDiscovery::new()
            .group("", &["v1"], Some("v1"))
            .group("metrics.k8s.io", &["v1beta1"], Some("v1beta1"))
            .group("apps", &["v1"], Some("v1"))
            .resources("v1", vec![resource("pods", "Pod", true)])
            .resources("apps/v1", vec![resource("deployments", "Deployment", true)]);

        let err = server_preferred_resources(&disco).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(count(&disco.calls.resources), 2);
    }

    #[tokio::test]
    async fn namespaced_resources_are_a_subset() {
        let disco = FakeDiscovery::new()
            .group("", &["v1"], Some("v1"))
            .group("rbac.authorization.k8s.io", &["v1"], Some("v1"))
            .resources("v1", vec![
                resource("pods", "Pod", true),
                resource("nodes", "Node", false),
            ])
            .resources("rbac.authorization.k8s.io/v1", vec![resource("clusterroles", "ClusterRole", false)]);

        let all = server_preferred_resources(&disco).await.unwrap();
        let namespaced = server_preferred_namespaced_resources(&disco).await.unwrap();
        assert_eq!(group_versions(&namespaced), group_versions(&all));
        assert_eq!(names(&namespaced[0]), vec!["pods"]);
        assert!(namespaced[1].resources.is_empty());
        for (list, full) in namespaced.iter().zip(&all) {
            for ar in &list.resources {
                assert!(ar.namespaced);
                assert!(full.resources.contains(ar));
            }
        }
    }

    #[tokio::test]
    async fn provided_methods_delegate() {
        let disco = FakeDiscovery::new()
            .group("", &["v1"], Some("v1"))
            .resources("v1", vec![resource("pods", "Pod", true)]);
        let via_trait = disco.server_preferred_resources().await.unwrap();
        assert_eq!(via_trait, server_preferred_resources(&disco).await.unwrap());
        assert_eq!(disco.server_resources().await.unwrap().len(), 1);
    }

    #[test]
    fn filter_passes_group_version() {
        let lists = vec![APIResourceList {
            group_version: "apps/v1".into(),
            resources: vec![resource("deployments", "Deployment", true)],
        }];
        let kept = filtered_by(|gv, _| gv == "apps/v1", lists.clone());
        assert_eq!(kept, lists);
        let dropped = filtered_by(|gv, _| gv == "v1", lists);
        assert_eq!(dropped[0].group_version, "apps/v1");
        assert!(dropped[0].resources.is_empty());
    }
}
