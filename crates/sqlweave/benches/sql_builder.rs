use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlweave::param::renumber;
use sqlweave::{DialectProfile, SqlArgument, SqlBuilder, SqlQuery, SqlString, SqlValue};

/// SELECT with `n` raw predicates, each written with local numbering `@p0`:
/// ... WHERE ([c0] = @p0) AND ([c1] = @p1) ...
fn build_chained_select(sb: &SqlBuilder, n: usize) -> SqlQuery {
    let mut builder = sb.select_all().from("t").expect("from");
    for i in 0..n {
        let predicate = format!("[c{i}] = @p0");
        let values = vec![SqlValue::I64(i as i64)];
        builder = if i == 0 {
            builder.where_sql(&predicate, values)
        } else {
            builder.and_where_sql(&predicate, values)
        }
        .expect("predicate");
    }
    builder.to_sql_query().expect("to_sql_query")
}

/// Fragment `a0 = @pN-1 OR a1 = @pN-2 ...`: tokens in descending order.
fn reversed_fragment(n: usize) -> (String, Vec<SqlArgument>) {
    let text = (0..n)
        .map(|i| format!("a{i} = @p{}", n - 1 - i))
        .collect::<Vec<_>>()
        .join(" OR ");
    let arguments = (0..n).map(|i| SqlArgument::new(i as i64)).collect();
    (text, arguments)
}

fn bench_chained_predicates(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/chained_predicates");
    let sb = SqlBuilder::new(DialectProfile::mssql());

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_chained_select(&sb, n)));
        });
    }

    group.finish();
}

fn bench_renumber(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/renumber");
    let profile = DialectProfile::mssql();

    for n in [5, 20, 100, 500] {
        let (text, arguments) = reversed_fragment(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(renumber(&text, arguments.clone(), 10, &profile).expect("renumber")));
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/in_list");
    let sb = SqlBuilder::new(DialectProfile::postgres());

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let q = sb
                    .select(["id"])
                    .and_then(|s| s.from("t"))
                    .and_then(|s| s.where_col("id"))
                    .and_then(|p| p.is_in(values.iter().copied()))
                    .and_then(|s| s.to_sql_query())
                    .expect("in list");
                black_box(q)
            });
        });
    }

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let sql = build_chained_select(&SqlBuilder::new(DialectProfile::mssql()), 20);
    let text = format!("{} GROUP BY [c0] ORDER BY [c1]", sql.command_text());

    c.bench_function("sql_builder/parse_all", |b| {
        b.iter(|| black_box(SqlString::parse_all(&text)));
    });
}

criterion_group!(
    benches,
    bench_chained_predicates,
    bench_renumber,
    bench_in_list,
    bench_parse
);
criterion_main!(benches);
