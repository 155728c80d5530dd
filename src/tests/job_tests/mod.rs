mod daily_stats_job_tests;
