//! Embedded sample data: twelve collection points around downtown Mobile, AL
//! and three morning readings for each of the eleven instrumented ones.

// Node 11 has no group; node 12 has no coordinates and no sensor.
pub const NODES_CSV: &str = "\
id,lat,lon,group\n\
1,30.6954,-88.0399,downtown\n\
2,30.6921,-88.0431,downtown\n\
3,30.6987,-88.0452,downtown\n\
4,30.7012,-88.0378,downtown\n\
5,30.7105,-88.0702,midtown\n\
6,30.7071,-88.0655,midtown\n\
7,30.7136,-88.061,midtown\n\
8,30.6702,-88.0305,southside\n\
9,30.6748,-88.0351,southside\n\
10,30.6665,-88.0262,southside\n\
11,30.68,-88.06,\n\
12,,,southside\n\
";

// 06:00, 08:00 and 10:00 UTC on Monday 2024-05-06.
pub const READINGS_CSV: &str = "\
node_id,timestamp,temperature,humidity,gas_level,waste_level\n\
1,2024-05-06T06:00:00Z,29.7,43.6,0.14,0.36\n\
1,2024-05-06T08:00:00Z,24.6,42.9,0.13,0.41\n\
1,2024-05-06T10:00:00Z,18.7,61.7,0.09,0.46\n\
2,2024-05-06T06:00:00Z,32.9,46.2,0.26,0.17\n\
2,2024-05-06T08:00:00Z,29.3,87.4,0.29,0.22\n\
2,2024-05-06T10:00:00Z,25.1,88.8,0.24,0.27\n\
3,2024-05-06T06:00:00Z,20.6,45.9,0.19,0.79\n\
3,2024-05-06T08:00:00Z,32.7,49.0,0.22,0.84\n\
3,2024-05-06T10:00:00Z,29.5,58.6,0.21,0.89\n\
4,2024-05-06T06:00:00Z,21.7,74.0,0.08,0.15\n\
4,2024-05-06T08:00:00Z,23.7,69.3,0.08,0.20\n\
4,2024-05-06T10:00:00Z,23.4,79.7,0.10,0.25\n\
5,2024-05-06T06:00:00Z,27.5,83.8,0.39,0.30\n\
5,2024-05-06T08:00:00Z,23.2,89.0,0.33,0.35\n\
5,2024-05-06T10:00:00Z,25.5,77.9,0.33,0.40\n\
6,2024-05-06T06:00:00Z,30.0,78.2,0.08,0.49\n\
6,2024-05-06T08:00:00Z,33.8,55.7,0.09,0.54\n\
6,2024-05-06T10:00:00Z,28.7,69.0,0.07,0.59\n\
7,2024-05-06T06:00:00Z,26.5,73.2,0.53,0.77\n\
7,2024-05-06T08:00:00Z,30.6,72.4,0.62,0.82\n\
7,2024-05-06T10:00:00Z,32.8,54.2,0.56,0.87\n\
8,2024-05-06T06:00:00Z,26.3,48.4,0.02,0.63\n\
8,2024-05-06T08:00:00Z,19.1,78.4,0.03,0.68\n\
8,2024-05-06T10:00:00Z,22.5,59.5,0.10,0.73\n\
9,2024-05-06T06:00:00Z,27.9,84.2,0.33,0.16\n\
9,2024-05-06T08:00:00Z,33.6,53.9,0.29,0.21\n\
9,2024-05-06T10:00:00Z,24.5,84.2,0.34,0.26\n\
10,2024-05-06T06:00:00Z,22.2,51.7,0.15,0.22\n\
10,2024-05-06T08:00:00Z,28.6,53.1,0.10,0.27\n\
10,2024-05-06T10:00:00Z,25.5,58.5,0.15,0.32\n\
11,2024-05-06T06:00:00Z,27.3,70.9,0.45,0.86\n\
11,2024-05-06T08:00:00Z,19.0,85.0,0.46,0.91\n\
11,2024-05-06T10:00:00Z,33.7,79.9,0.42,0.96\n\
";
