use serde_json::{Value, json};

use scout_domain::{
	Criterion, FieldTable, FilterPlan, Operator, Plan, PlanDefaults, RankPlan, Record, RecordId,
	SkillCount, aggregate, filter_records, matches, rank_records, record_ids,
};

fn ids(values: &[i64]) -> Vec<RecordId> {
	values.iter().copied().map(RecordId::Int).collect()
}

fn include_only(criteria: Vec<Criterion>) -> FilterPlan {
	FilterPlan { include: criteria, exclude: Vec::new() }
}

#[test]
fn cyprus_react_developers_rank_by_experience() {
	let candidates = scout_testkit::cyprus_candidates();
	let raw_plan = json!({
		"filter": {
			"include": [
				{ "field": "skills", "value": "React", "type": "contains" },
				{ "field": "location", "value": "Cyprus", "type": "contains" }
			],
			"exclude": []
		},
		"rank": { "primary": "experience", "tie_breakers": [] }
	});
	let plan = Plan::from_value(&raw_plan, &PlanDefaults::default());
	let filtered = filter_records(plan.filter.as_ref(), &candidates);

	assert_eq!(record_ids(filtered.iter().copied()), ids(&[5, 12]));

	let ranked =
		rank_records(&record_ids(filtered), plan.rank.as_ref(), &candidates, &FieldTable::builtin());

	assert_eq!(record_ids(ranked), ids(&[12, 5]));
}

#[test]
fn include_only_plans_return_an_ordered_subset() {
	let pool = scout_testkit::talent_pool();
	let plans = [
		include_only(vec![Criterion::new("location", Operator::Contains, "cyprus")]),
		include_only(vec![Criterion::new("years_experience", Operator::Gte, 4.0)]),
		include_only(vec![
			Criterion::new("skills", Operator::Contains, "react"),
			Criterion::new("willing_to_relocate", Operator::Boolean, true),
		]),
		include_only(vec![Criterion::new("name", Operator::Regex, "^(ada|eve)$")]),
	];

	for plan in plans {
		let filtered = filter_records(Some(&plan), &pool);
		let positions: Vec<usize> = filtered
			.iter()
			.map(|record| {
				pool.iter()
					.position(|candidate| candidate.id() == record.id())
					.expect("filtered record must come from the pool")
			})
			.collect();

		assert!(filtered.len() <= pool.len());
		assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "order must be preserved");
	}
}

#[test]
fn exclude_and_include_partition_the_records() {
	let pool = scout_testkit::talent_pool();
	let criteria = [
		Criterion::new("location", Operator::Contains, "Cyprus"),
		Criterion::new("years_experience", Operator::Lte, 4.0),
		Criterion::new("willing_to_relocate", Operator::Boolean, true),
		Criterion::new("work_preference", Operator::Exact, "remote"),
		Criterion::new("skills", Operator::Regex, "rust|python"),
		Criterion::new("skills", Operator::Regex, "(broken"),
	];

	for criterion in criteria {
		let kept = record_ids(filter_records(Some(&include_only(vec![criterion.clone()])), &pool));
		let dropped = record_ids(filter_records(
			Some(&FilterPlan { include: Vec::new(), exclude: vec![criterion.clone()] }),
			&pool,
		));

		assert_eq!(kept.len() + dropped.len(), pool.len(), "criterion {criterion:?}");
		assert!(kept.iter().all(|id| !dropped.contains(id)), "criterion {criterion:?}");
	}
}

#[test]
fn empty_plan_is_identity() {
	let pool = scout_testkit::talent_pool();
	let plan = Plan::from_value(&json!({}), &PlanDefaults::default());

	assert_eq!(record_ids(filter_records(plan.filter.as_ref(), &pool)), record_ids(&pool));
	assert_eq!(record_ids(filter_records(Some(&FilterPlan::default()), &pool)), record_ids(&pool));
	assert_eq!(record_ids(filter_records(None, &pool)), record_ids(&pool));
}

#[test]
fn distinct_primary_values_rank_descending() {
	let pool = scout_testkit::talent_pool();
	let ranked = rank_records(
		&record_ids(&pool),
		Some(&RankPlan::new("desired_salary_usd")),
		&pool,
		&FieldTable::builtin(),
	);

	// "n/a" and a missing salary both resolve to 0; they keep dataset order.
	assert_eq!(
		record_ids(ranked),
		vec![
			RecordId::Int(1),
			RecordId::Int(5),
			RecordId::Int(6),
			RecordId::Int(2),
			RecordId::Int(3),
			RecordId::Text("x-4".to_string()),
		]
	);
}

#[test]
fn tie_breakers_cascade() {
	let pool = scout_testkit::talent_pool();
	let table = FieldTable::builtin();
	let subset = ids(&[2, 3, 6]);
	let plan = RankPlan::new("years_experience").with_tie_breaker("desired_salary_usd");

	assert_eq!(record_ids(rank_records(&subset, Some(&plan), &pool, &table)), ids(&[6, 2, 3]));

	let plan = RankPlan::new("years_experience")
		.with_tie_breaker("willing_to_relocate")
		.with_tie_breaker("name");

	assert_eq!(record_ids(rank_records(&subset, Some(&plan), &pool, &table)), ids(&[6, 3, 2]));
}

#[test]
fn full_ties_keep_dataset_order() {
	let pool = scout_testkit::talent_pool();
	let ranked = rank_records(
		&ids(&[6, 3, 2]),
		Some(&RankPlan::new("years_experience")),
		&pool,
		&FieldTable::builtin(),
	);

	assert_eq!(record_ids(ranked), ids(&[2, 3, 6]));
}

#[test]
fn missing_rank_plan_filters_by_id_only() {
	let pool = scout_testkit::talent_pool();
	let ranked = rank_records(&ids(&[6, 1, 404]), None, &pool, &FieldTable::builtin());

	assert_eq!(record_ids(ranked), ids(&[1, 6]));
}

#[test]
fn unclassified_numeric_fields_rank_numerically_with_gaps() {
	let records = scout_testkit::records_from_json(json!([
		{ "id": 1, "github_stars": 9 },
		{ "id": 2, "github_stars": 10 },
		{ "id": 3 },
		{ "id": 4, "github_stars": 250 },
		{ "id": 5, "github_stars": "" },
		{ "id": 6, "github_stars": 31 },
	]));
	let ranked = rank_records(
		&record_ids(&records),
		Some(&RankPlan::new("github_stars")),
		&records,
		&FieldTable::builtin(),
	);

	assert_eq!(record_ids(ranked), ids(&[4, 6, 2, 1, 3, 5]));
}

#[test]
fn skills_count_ranks_by_cardinality() {
	let pool = scout_testkit::talent_pool();
	let ranked = rank_records(
		&ids(&[1, 5, 6]),
		Some(&RankPlan::new("skills_count")),
		&pool,
		&FieldTable::builtin(),
	);

	assert_eq!(record_ids(ranked), ids(&[1, 5, 6]));
}

#[test]
fn aggregation_scenario() {
	let records: Vec<Record> = scout_testkit::records_from_json(json!([
		{ "id": 1, "experience": 3, "skills": "React,CSS" },
		{ "id": 2, "experience": 7, "skills": "React,Node" },
	]));
	let summary = aggregate(&ids(&[1, 2]), &records);

	assert_eq!(summary.count, 2);
	assert_eq!(summary.avg_experience, 5.0);
	assert_eq!(summary.top_skills[0], SkillCount { skill: "React".to_string(), count: 2 });
	assert_eq!(summary.top_skills.len(), 3);
}

#[test]
fn operator_table() {
	let cases: Vec<(Value, Criterion, bool)> = vec![
		(json!("Remote"), Criterion::new("f", Operator::Exact, "REMOTE"), true),
		(json!("Remote"), Criterion::new("f", Operator::Exact, "Onsite"), false),
		(json!("Senior React Developer"), Criterion::new("f", Operator::Contains, "react"), true),
		(json!("Backend Developer"), Criterion::new("f", Operator::Contains, "react"), false),
		(json!("Master's"), Criterion::new("f", Operator::Regex, "^master"), true),
		(json!("Bachelor's"), Criterion::new("f", Operator::Regex, "^master"), false),
		(json!("6"), Criterion::new("f", Operator::Gte, 5.0), true),
		(json!(4), Criterion::new("f", Operator::Gte, 5.0), false),
		(json!(140000), Criterion::new("f", Operator::Lte, 150000.0), true),
		(json!("160000"), Criterion::new("f", Operator::Lte, 150000.0), false),
		(json!("1"), Criterion::new("f", Operator::Boolean, true), true),
		(json!("false"), Criterion::new("f", Operator::Boolean, true), false),
	];

	for (value, criterion, expected) in cases {
		assert_eq!(matches(Some(&value), &criterion), expected, "{value} vs {criterion:?}");
	}
}

#[test]
fn malformed_plans_never_panic() {
	let pool = scout_testkit::talent_pool();
	let table = FieldTable::builtin();
	let defaults = PlanDefaults::default();
	let plans = [
		Value::Null,
		json!("filter everything"),
		json!(42),
		json!([]),
		json!({ "filter": null, "rank": null }),
		json!({ "filter": [], "rank": "experience" }),
		json!({ "filter": { "include": null, "exclude": {} } }),
		json!({ "filter": { "include": [null, 1, "x", {}] } }),
		json!({ "filter": { "include": [{ "field": 7, "operator": "gte", "value": 1 }] } }),
		json!({ "filter": { "include": [{ "field": "years_experience", "operator": 3, "value": "x" }] } }),
		json!({ "filter": { "include": [{ "field": "missing", "operator": "gte", "value": "abc" }] } }),
		json!({ "filter": { "exclude": [{ "field": "name", "operator": "regex", "value": "[" }] } }),
		json!({ "rank": { "primary": "" } }),
		json!({ "rank": { "primary": "nope", "tie_breakers": "x" } }),
		json!({ "rank": { "primary": "years_experience", "tie_breakers": [null, {}, "start_date"] } }),
	];

	for raw in plans {
		let plan = Plan::from_value(&raw, &defaults);
		let filtered = filter_records(plan.filter.as_ref(), &pool);
		let ranked = rank_records(&record_ids(filtered.iter().copied()), plan.rank.as_ref(), &pool, &table);

		assert!(ranked.len() <= pool.len(), "plan {raw}");

		let _ = aggregate(&record_ids(ranked), &pool);
	}
}
