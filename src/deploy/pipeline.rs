// Tag selection and dependency ordering for deploy steps.
//
// A step is selected when it carries a requested tag, or when a selected step
// depends on one of its tags. Selected steps keep their declared order except
// that every dependency provider runs before its dependents.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::{DeployError, Result};

pub trait Tagged {
    fn id(&self) -> &str;
    fn tags(&self) -> &[&'static str];
    fn dependencies(&self) -> &[&'static str];
}

/// Returns the steps to run, in run order. An empty `requested` selects everything.
pub fn resolve<'a, S: Tagged>(steps: &'a [S], requested: &[String]) -> Result<Vec<&'a S>> {
    let mut providers: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, step) in steps.iter().enumerate() {
        for tag in step.tags() {
            providers.entry(*tag).or_default().push(idx);
        }
    }

    let mut roots = Vec::new();
    if requested.is_empty() {
        roots.extend(0..steps.len());
    } else {
        for tag in requested {
            let found = providers
                .get(tag.as_str())
                .ok_or_else(|| DeployError::UnknownTag(tag.clone()))?;
            roots.extend(found.iter().copied());
        }
    }

    let mut selected = BTreeSet::new();
    let mut visiting = HashSet::new();
    for idx in roots {
        select(idx, steps, &providers, &mut visiting, &mut selected)?;
    }

    // Lowest declared index whose providers have all run goes next.
    let mut order = Vec::with_capacity(selected.len());
    let mut done = HashSet::new();
    while done.len() < selected.len() {
        let next = selected
            .iter()
            .copied()
            .find(|idx| !done.contains(idx) && ready(*idx, steps, &providers, &done))
            .ok_or_else(|| {
                let stuck = selected.iter().copied().find(|idx| !done.contains(idx)).unwrap_or(0);
                DeployError::DependencyCycle(steps[stuck].id().to_string())
            })?;
        done.insert(next);
        order.push(&steps[next]);
    }
    Ok(order)
}

fn select<S: Tagged>(
    idx: usize,
    steps: &[S],
    providers: &HashMap<&str, Vec<usize>>,
    visiting: &mut HashSet<usize>,
    selected: &mut BTreeSet<usize>,
) -> Result<()> {
    if selected.contains(&idx) {
        return Ok(());
    }
    if !visiting.insert(idx) {
        return Err(DeployError::DependencyCycle(steps[idx].id().to_string()));
    }

    for provider in dependency_providers(idx, steps, providers)? {
        select(provider, steps, providers, visiting, selected)?;
    }

    visiting.remove(&idx);
    selected.insert(idx);
    Ok(())
}

fn ready<S: Tagged>(
    idx: usize,
    steps: &[S],
    providers: &HashMap<&str, Vec<usize>>,
    done: &HashSet<usize>,
) -> bool {
    dependency_providers(idx, steps, providers)
        .map(|deps| deps.iter().all(|dep| done.contains(dep)))
        .unwrap_or(false)
}

fn dependency_providers<S: Tagged>(
    idx: usize,
    steps: &[S],
    providers: &HashMap<&str, Vec<usize>>,
) -> Result<Vec<usize>> {
    let mut found = Vec::new();
    for dep in steps[idx].dependencies() {
        let list = providers
            .get(dep)
            .ok_or_else(|| DeployError::UnknownTag(dep.to_string()))?;
        found.extend(list.iter().copied().filter(|p| *p != idx));
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Step {
        id: &'static str,
        tags: Vec<&'static str>,
        deps: Vec<&'static str>,
    }

    impl Tagged for Step {
        fn id(&self) -> &str {
            self.id
        }
        fn tags(&self) -> &[&'static str] {
            &self.tags
        }
        fn dependencies(&self) -> &[&'static str] {
            &self.deps
        }
    }

    fn step(id: &'static str, tags: &[&'static str], deps: &[&'static str]) -> Step {
        Step { id, tags: tags.to_vec(), deps: deps.to_vec() }
    }

    fn ids(steps: &[&Step]) -> Vec<&'static str> {
        steps.iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_dependency_declared_later_runs_first() {
        let steps = vec![
            step("consumer", &["all", "consumer"], &["provider"]),
            step("provider", &["all", "provider"], &[]),
        ];
        let order = resolve(&steps, &[]).expect("resolve");
        assert_eq!(ids(&order), vec!["provider", "consumer"]);
    }

    #[test]
    fn test_requested_tag_pulls_transitive_dependencies() {
        let steps = vec![
            step("a", &["a"], &[]),
            step("b", &["b"], &["a"]),
            step("c", &["c"], &["b"]),
            step("d", &["d"], &[]),
        ];
        let order = resolve(&steps, &["c".to_string()]).expect("resolve");
        assert_eq!(ids(&order), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_cycle_is_rejected() {
        let steps = vec![
            step("x", &["x"], &["y"]),
            step("y", &["y"], &["x"]),
        ];
        assert!(matches!(resolve(&steps, &[]), Err(DeployError::DependencyCycle(_))));
    }

    #[test]
    fn test_unknown_tags_are_rejected() {
        let steps = vec![step("x", &["x"], &["missing"])];
        assert!(matches!(resolve(&steps, &["nope".to_string()]), Err(DeployError::UnknownTag(t)) if t == "nope"));
        assert!(matches!(resolve(&steps, &[]), Err(DeployError::UnknownTag(t)) if t == "missing"));
    }
}
